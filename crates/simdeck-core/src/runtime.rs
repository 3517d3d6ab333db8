//! Runtime key parsing.
//!
//! `simctl list -j devices` keys its device arrays by runtime identifier, e.g.
//! `com.apple.CoreSimulator.SimRuntime.iOS-16-2`. The operating system is not
//! reported per device, so it is recovered from that key.
//!
//! # Grammar
//!
//! ```text
//! key     := segment ("." segment)*
//! last    := name ("-" part)+        ; the final dot-separated segment
//! version := part ("." part)*
//! ```
//!
//! The name is the first dash-separated piece of the final segment, the
//! version is every remaining piece joined with `.`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing a runtime key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeKeyError {
    /// The key, or its final dot-separated segment, is empty.
    #[error("runtime key is empty")]
    Empty,

    /// The final segment has no dash-separated version.
    #[error("runtime key has no version: {0}")]
    MissingVersion(String),

    /// The final segment starts with a dash.
    #[error("runtime key has no OS name: {0}")]
    MissingName(String),

    /// Two dashes in a row, or a trailing dash.
    #[error("runtime key has an empty version component: {0}")]
    EmptyVersionPart(String),
}

/// An operating system derived from a runtime key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatingSystem {
    /// OS family, e.g. "iOS", "watchOS".
    pub name: String,
    /// Dotted version, e.g. "16.2".
    pub version: String,
}

impl std::fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// Derives the operating system from a simctl runtime key.
///
/// # Errors
///
/// Returns a [`RuntimeKeyError`] describing the first grammar violation.
/// Malformed keys are rejected rather than truncated.
pub fn derive_os(key: &str) -> Result<OperatingSystem, RuntimeKeyError> {
    let last = key.rsplit('.').next().unwrap_or_default();
    if last.is_empty() {
        return Err(RuntimeKeyError::Empty);
    }

    let mut pieces = last.split('-');
    let name = pieces.next().unwrap_or_default();
    let parts: Vec<&str> = pieces.collect();

    if parts.is_empty() {
        return Err(RuntimeKeyError::MissingVersion(key.to_string()));
    }
    if name.is_empty() {
        return Err(RuntimeKeyError::MissingName(key.to_string()));
    }
    if parts.iter().any(|p| p.is_empty()) {
        return Err(RuntimeKeyError::EmptyVersionPart(key.to_string()));
    }

    Ok(OperatingSystem {
        name: name.to_string(),
        version: parts.join("."),
    })
}
