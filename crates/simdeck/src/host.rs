//! Desktop services used by the device actions: clipboard and Finder.

use std::path::Path;
use std::process::Command;

use tracing::debug;

/// Program used to reveal a path in the file manager.
const REVEAL_PROGRAM: &str = "open";

/// Clipboard and file-manager access.
///
/// Shared with blocking workers, so implementations must be thread-safe.
pub trait Host: Send + Sync + 'static {
    fn copy_text(&self, text: &str) -> Result<(), String>;
    fn reveal(&self, path: &Path) -> Result<(), String>;
}

/// [`Host`] backed by the system clipboard and `open -R`.
#[derive(Default)]
pub struct SystemHost;

impl Host for SystemHost {
    fn copy_text(&self, text: &str) -> Result<(), String> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| format!("clipboard unavailable: {}", e))?;
        clipboard
            .set_text(text)
            .map_err(|e| format!("clipboard write failed: {}", e))
    }

    fn reveal(&self, path: &Path) -> Result<(), String> {
        debug!(path = %path.display(), "revealing in file manager");
        let output = Command::new(REVEAL_PROGRAM)
            .arg("-R")
            .arg(path)
            .output()
            .map_err(|e| format!("failed to run {}: {}", REVEAL_PROGRAM, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(if stderr.is_empty() {
                format!("{} exited with {}", REVEAL_PROGRAM, output.status)
            } else {
                stderr
            });
        }
        Ok(())
    }
}
