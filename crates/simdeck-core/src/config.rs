//! Optional user configuration.
//!
//! Read from `~/.simdeck/config.json` when present. Every field is optional;
//! command-line flags and environment variables take precedence over it.
//!
//! ```json
//! { "xcrun": "/Applications/Xcode-beta.app/Contents/Developer/usr/bin/xcrun", "toast_ms": 3000 }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

const CONFIG_FILENAME: &str = "config.json";
const LOGS_DIRNAME: &str = "logs";

/// How long a notification stays on screen unless configured otherwise.
pub const DEFAULT_TOAST: Duration = Duration::from_millis(2000);

/// Returns `~/.simdeck`, falling back to the temp dir when there is no home.
pub fn simdeck_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".simdeck")
}

/// Directory for log files, created on demand.
pub fn logs_dir() -> PathBuf {
    let dir = simdeck_dir().join(LOGS_DIRNAME);
    std::fs::create_dir_all(&dir).ok();
    dir
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SimdeckConfig {
    /// xcrun executable to use instead of the one on `PATH`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xcrun: Option<PathBuf>,

    /// Notification lifetime in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toast_ms: Option<u64>,
}

impl SimdeckConfig {
    /// Load config from `~/.simdeck/config.json`.
    ///
    /// Returns [`Default`] if the file does not exist, cannot be read, or
    /// cannot be parsed. Anything other than a missing file is logged.
    pub fn load() -> Self {
        Self::load_from(&simdeck_dir().join(CONFIG_FILENAME))
    }

    pub fn load_from(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                return Self::default();
            }
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring invalid config");
            Self::default()
        })
    }

    pub fn toast_duration(&self) -> Duration {
        self.toast_ms.map(Duration::from_millis).unwrap_or(DEFAULT_TOAST)
    }
}
