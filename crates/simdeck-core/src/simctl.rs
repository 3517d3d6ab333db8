//! Interface to Apple's `xcrun simctl` command-line tool.
//!
//! This module wraps the two simctl invocations simdeck needs: listing the
//! available devices as JSON and booting a device by UDID. Commands go through
//! a [`CommandRunner`] so that callers (and tests) can substitute the process
//! layer.
//!
//! # Requirements
//!
//! Xcode must be installed for `xcrun simctl` to be available.
//!
//! # Example
//!
//! ```no_run
//! use simdeck_core::simctl::Simctl;
//!
//! let simctl = Simctl::new();
//! let json = simctl.list_available().unwrap();
//! println!("{} bytes of device JSON", json.len());
//!
//! simctl.boot("A1B2C3D4-E5F6-7890-ABCD-EF1234567890").unwrap();
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

/// Default program used to reach simctl.
pub const DEFAULT_XCRUN: &str = "xcrun";

/// Errors that can occur when interacting with simctl.
#[derive(Error, Debug)]
pub enum SimctlError {
    /// A simctl command ran but exited unsuccessfully.
    #[error("{0}")]
    CommandFailed(String),

    /// The command could not be started (e.g. xcrun is not installed).
    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Whether the process exited with status zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Best human-readable description of a failure.
    ///
    /// Prefers trimmed stderr, then trimmed stdout, then the exit status.
    pub fn failure_message(&self) -> String {
        let stderr = String::from_utf8_lossy(&self.stderr).trim().to_string();
        if !stderr.is_empty() {
            return stderr;
        }
        let stdout = String::from_utf8_lossy(&self.stdout).trim().to_string();
        if !stdout.is_empty() {
            return stdout;
        }
        match self.code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs external programs to completion.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Handle for issuing `xcrun simctl` commands.
///
/// Cheap to clone; clones share the same runner.
#[derive(Clone)]
pub struct Simctl {
    xcrun: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for Simctl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simctl").field("xcrun", &self.xcrun).finish_non_exhaustive()
    }
}

impl Default for Simctl {
    fn default() -> Self {
        Self::new()
    }
}

impl Simctl {
    /// Simctl reached through `xcrun` on `PATH`.
    pub fn new() -> Self {
        Self::with_runner(DEFAULT_XCRUN, Arc::new(SystemRunner))
    }

    /// Simctl reached through a specific xcrun executable.
    pub fn with_xcrun(xcrun: impl Into<PathBuf>) -> Self {
        Self::with_runner(xcrun, Arc::new(SystemRunner))
    }

    pub fn with_runner(xcrun: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { xcrun: xcrun.into(), runner }
    }

    /// Path of the xcrun program this handle invokes.
    pub fn xcrun(&self) -> &Path {
        &self.xcrun
    }

    /// Lists the available simulators as raw JSON.
    ///
    /// Runs `xcrun simctl list -j devices available` and returns its stdout.
    ///
    /// # Errors
    ///
    /// - [`SimctlError::Io`] if the command cannot be started
    /// - [`SimctlError::CommandFailed`] if simctl exits non-zero
    pub fn list_available(&self) -> Result<Vec<u8>, SimctlError> {
        let output = self.simctl(&["list", "-j", "devices", "available"])?;
        if !output.success() {
            return Err(SimctlError::CommandFailed(output.failure_message()));
        }
        Ok(output.stdout)
    }

    /// Boots a simulator device.
    ///
    /// Any non-zero exit is a failure, including simctl's complaint that the
    /// device is already booted.
    ///
    /// # Errors
    ///
    /// - [`SimctlError::Io`] if the command cannot be started
    /// - [`SimctlError::CommandFailed`] with simctl's message otherwise
    pub fn boot(&self, udid: &str) -> Result<(), SimctlError> {
        let output = self.simctl(&["boot", udid])?;
        if !output.success() {
            return Err(SimctlError::CommandFailed(output.failure_message()));
        }
        Ok(())
    }

    fn simctl(&self, args: &[&str]) -> Result<CommandOutput, SimctlError> {
        let mut full: Vec<OsString> = Vec::with_capacity(args.len() + 1);
        full.push("simctl".into());
        full.extend(args.iter().map(OsString::from));

        debug!(program = %self.xcrun.display(), ?args, "running simctl");
        let output = self.runner.run(&self.xcrun, &full).map_err(|source| SimctlError::Io {
            program: self.xcrun.display().to_string(),
            source,
        })?;
        debug!(code = ?output.code, stdout_len = output.stdout.len(), "simctl finished");
        Ok(output)
    }
}
