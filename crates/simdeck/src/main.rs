//! Terminal browser for the iOS Simulators installed on this Mac.
//!
//! Lists available simulators grouped by OS, and lets you copy a device's
//! UDID, boot it, or reveal its data directory in Finder.
//!
//! # Usage
//!
//! ```bash
//! # Interactive browser
//! simdeck
//!
//! # Print the grouped catalog
//! simdeck list
//! simdeck list --json
//!
//! # Boot a device
//! simdeck boot 33333333-3333-3333-3333-333333333333
//!
//! # Use a specific Xcode's xcrun
//! SIMDECK_XCRUN=/Applications/Xcode-beta.app/Contents/Developer/usr/bin/xcrun simdeck
//! ```

mod app;
mod format;
mod host;
mod tui;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use simdeck_core::boot::boot_device;
use simdeck_core::catalog;
use simdeck_core::config::{logs_dir, SimdeckConfig};
use simdeck_core::simctl::{Simctl, DEFAULT_XCRUN};
use tracing_subscriber::EnvFilter;

/// Browse, boot and inspect iOS Simulators.
#[derive(Parser, Debug)]
#[command(name = "simdeck")]
#[command(about = "Browse iOS Simulators: copy UDIDs, boot devices, reveal data paths")]
#[command(version)]
struct Cli {
    /// xcrun executable used to reach simctl
    #[arg(long, env = "SIMDECK_XCRUN")]
    xcrun: Option<PathBuf>,

    /// How long notifications stay visible, in milliseconds
    #[arg(long, env = "SIMDECK_TOAST_MS")]
    toast_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print available simulators grouped by OS
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Boot a simulator by UDID
    Boot {
        /// Device UDID
        udid: String,
    },
}

#[derive(Debug)]
enum CliError {
    Load(String),
    ActionFailed(String),
    Terminal(std::io::Error),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::ActionFailed(_) => ExitCode::from(1),
            CliError::Load(_) => ExitCode::from(2),
            CliError::Terminal(_) => ExitCode::from(3),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Load(msg) => write!(f, "Failed to load simulators: {}", msg),
            CliError::ActionFailed(msg) => write!(f, "{}", msg),
            CliError::Terminal(e) => write!(f, "Terminal error: {}", e),
        }
    }
}

/// Settings after layering flags and environment over the config file.
struct Settings {
    xcrun: PathBuf,
    toast: Duration,
}

impl Settings {
    fn resolve(cli: &Cli, config: SimdeckConfig) -> Self {
        let toast = cli
            .toast_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| config.toast_duration());
        let xcrun = cli
            .xcrun
            .clone()
            .or(config.xcrun)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_XCRUN));
        Self { xcrun, toast }
    }
}

fn init_logging(interactive: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    if interactive {
        // The terminal belongs to the UI; log to a file instead.
        let file_appender = tracing_appender::rolling::daily(logs_dir(), "simdeck.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(non_blocking)
            .with_ansi(false)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
        None
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_logging(cli.command.is_none());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::resolve(&cli, SimdeckConfig::load());
    tracing::debug!(xcrun = %settings.xcrun.display(), "resolved settings");
    let simctl = Simctl::with_xcrun(settings.xcrun);

    match cli.command {
        None => tui::run(simctl, settings.toast).await.map_err(CliError::Terminal),
        Some(Command::List { json }) => {
            let catalog = tokio::task::spawn_blocking(move || catalog::load(&simctl))
                .await
                .map_err(|e| CliError::Load(e.to_string()))?
                .map_err(|e| CliError::Load(e.to_string()))?;

            if json {
                let text = serde_json::to_string_pretty(&catalog)
                    .map_err(|e| CliError::Load(e.to_string()))?;
                println!("{}", text);
            } else if catalog.is_empty() {
                eprintln!("No simulators available");
            } else {
                print!("{}", format::catalog_text(&catalog));
            }
            Ok(())
        }
        Some(Command::Boot { udid }) => {
            let result = tokio::task::spawn_blocking(move || boot_device(&simctl, &udid))
                .await
                .map_err(|e| CliError::ActionFailed(e.to_string()))?;

            if result.is_success() {
                println!("{}", result.notification());
                Ok(())
            } else {
                Err(CliError::ActionFailed(result.notification().to_string()))
            }
        }
    }
}
