//! Booting a simulator into a single-outcome result.

use serde::Serialize;
use tracing::{info, warn};

use crate::simctl::Simctl;

/// Text shown after a successful boot.
pub const BOOTED_MESSAGE: &str = "booted";

/// Outcome of one boot request.
///
/// Exactly one notification belongs to each outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum BootResult {
    Booted { udid: String },
    Failed { udid: String, message: String },
}

impl BootResult {
    pub fn udid(&self) -> &str {
        match self {
            BootResult::Booted { udid } | BootResult::Failed { udid, .. } => udid,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BootResult::Booted { .. })
    }

    /// The notification text for this outcome.
    pub fn notification(&self) -> &str {
        match self {
            BootResult::Booted { .. } => BOOTED_MESSAGE,
            BootResult::Failed { message, .. } => message,
        }
    }
}

/// Boots `udid` and folds the outcome into a [`BootResult`].
///
/// Blocks until simctl returns.
pub fn boot_device(simctl: &Simctl, udid: &str) -> BootResult {
    match simctl.boot(udid) {
        Ok(()) => {
            info!(udid, "simulator booted");
            BootResult::Booted { udid: udid.to_string() }
        }
        Err(e) => {
            warn!(udid, error = %e, "simulator boot failed");
            BootResult::Failed {
                udid: udid.to_string(),
                message: e.to_string(),
            }
        }
    }
}
