//! Shared test helpers for simdeck-core integration tests.
//!
//! [`FakeSimctl`] stands in for the xcrun process: it answers each simctl
//! subcommand with a canned [`CommandOutput`] and records what was asked.

#![allow(dead_code)]

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::Path;
use std::sync::{Arc, Mutex};

use simdeck_core::simctl::{CommandOutput, CommandRunner, Simctl};

/// A two-runtime listing shaped like real `simctl list -j devices available` output.
pub const LISTING: &str = r#"{
  "devices" : {
    "com.apple.CoreSimulator.SimRuntime.iOS-15-5" : [
      {
        "lastBootedAt" : "2024-01-10T09:12:44Z",
        "dataPath" : "/Users/dev/Library/Developer/CoreSimulator/Devices/11111111-1111-1111-1111-111111111111/data",
        "dataPathSize" : 13312000,
        "logPath" : "/Users/dev/Library/Logs/CoreSimulator/11111111-1111-1111-1111-111111111111",
        "udid" : "11111111-1111-1111-1111-111111111111",
        "isAvailable" : true,
        "deviceTypeIdentifier" : "com.apple.CoreSimulator.SimDeviceType.iPhone-8",
        "state" : "Shutdown",
        "name" : "iPhone 8"
      }
    ],
    "com.apple.CoreSimulator.SimRuntime.tvOS-16-1" : [
      {
        "dataPath" : "/Users/dev/Library/Developer/CoreSimulator/Devices/22222222-2222-2222-2222-222222222222/data",
        "udid" : "22222222-2222-2222-2222-222222222222",
        "isAvailable" : true,
        "state" : "Shutdown",
        "name" : "Apple TV"
      }
    ],
    "com.apple.CoreSimulator.SimRuntime.iOS-16-2" : [
      {
        "dataPath" : "/Users/dev/Library/Developer/CoreSimulator/Devices/33333333-3333-3333-3333-333333333333/data",
        "udid" : "33333333-3333-3333-3333-333333333333",
        "isAvailable" : true,
        "state" : "Booted",
        "name" : "iPhone 14"
      },
      {
        "dataPath" : "/Users/dev/Library/Developer/CoreSimulator/Devices/44444444-4444-4444-4444-444444444444/data",
        "udid" : "44444444-4444-4444-4444-444444444444",
        "isAvailable" : true,
        "state" : "Shutdown",
        "name" : "iPhone 14 Pro"
      }
    ]
  }
}"#;

/// Canned simctl keyed by its first subcommand word ("list", "boot").
#[derive(Default)]
pub struct FakeSimctl {
    responses: HashMap<String, CommandOutput>,
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl FakeSimctl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, subcommand: &str, code: i32, stdout: &str, stderr: &str) -> Self {
        self.responses.insert(
            subcommand.to_string(),
            CommandOutput {
                code: Some(code),
                stdout: stdout.as_bytes().to_vec(),
                stderr: stderr.as_bytes().to_vec(),
            },
        );
        self
    }

    pub fn into_simctl(self) -> (Simctl, Arc<FakeSimctl>) {
        let fake = Arc::new(self);
        (Simctl::with_runner("xcrun", fake.clone()), fake)
    }
}

impl CommandRunner for FakeSimctl {
    fn run(&self, _program: &Path, args: &[OsString]) -> std::io::Result<CommandOutput> {
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().to_string()).collect();
        self.calls.lock().unwrap().push(args.clone());

        let subcommand = args.get(1).cloned().unwrap_or_default();
        self.responses.get(&subcommand).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, format!("no canned response for {}", subcommand))
        })
    }
}
