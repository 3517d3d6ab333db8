//! # simdeck-core
//!
//! Core library for browsing the iOS Simulators installed on a Mac.
//!
//! The crate wraps `xcrun simctl`, turns its device listing into a catalog
//! grouped by operating system, and boots devices on request. It has no UI of
//! its own; the `simdeck` binary renders the catalog in a terminal.
//!
//! ## Modules
//!
//! - [`simctl`] - Wrapper around Apple's `xcrun simctl` CLI, behind a [`simctl::CommandRunner`]
//! - [`runtime`] - Parsing of simctl runtime keys into an [`runtime::OperatingSystem`]
//! - [`catalog`] - Device records and the OS-grouped catalog
//! - [`boot`] - Booting a device into a single-outcome [`boot::BootResult`]
//! - [`config`] - Optional user configuration in `~/.simdeck/config.json`
//!
//! ## Example
//!
//! ```no_run
//! use simdeck_core::catalog;
//! use simdeck_core::simctl::Simctl;
//!
//! let simctl = Simctl::new();
//! let catalog = catalog::load(&simctl).expect("simctl listing failed");
//! for group in catalog.groups() {
//!     println!("{}", group.os_name);
//!     for device in &group.devices {
//!         println!("  {} ({}) {}", device.name, device.os.version, device.udid);
//!     }
//! }
//! ```

pub mod boot;
pub mod catalog;
pub mod config;
pub mod runtime;
pub mod simctl;
