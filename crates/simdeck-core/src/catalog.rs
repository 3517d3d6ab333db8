//! Device records and the OS-grouped catalog.
//!
//! Loading happens in three steps:
//!
//! 1. [`Simctl::list_available`] fetches the raw JSON
//! 2. [`parse_devices`] flattens `{ "devices": { runtime: [device] } }` into
//!    [`DeviceRecord`]s, deriving each record's OS from its runtime key
//! 3. [`group`] folds the records into a [`GroupedCatalog`], one group per OS
//!    name in order of first appearance
//!
//! Runtime key order from simctl is preserved throughout.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::runtime::{derive_os, OperatingSystem, RuntimeKeyError};
use crate::simctl::{Simctl, SimctlError};

/// Errors that can occur while loading the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The enumeration command failed.
    #[error("simctl failed: {0}")]
    Simctl(#[from] SimctlError),

    /// simctl printed something that is not the expected JSON document.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A runtime key did not follow the `<prefix>.<Name>-<version...>` shape.
    #[error("bad runtime key {key:?}: {source}")]
    RuntimeKey {
        key: String,
        #[source]
        source: RuntimeKeyError,
    },
}

/// A simulator as listed by simctl, with its operating system attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    pub os: OperatingSystem,

    /// The unique device identifier.
    pub udid: String,

    #[serde(rename = "isAvailable")]
    pub is_available: bool,

    /// Runtime status, e.g. "Booted" or "Shutdown".
    pub state: String,

    /// Device model name, e.g. "iPhone 15 Pro".
    pub name: String,

    /// Directory holding the device's private storage.
    #[serde(rename = "dataPath")]
    pub data_path: PathBuf,

    #[serde(rename = "deviceTypeIdentifier", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
}

impl DeviceRecord {
    pub fn is_booted(&self) -> bool {
        self.state == "Booted"
    }

    /// List title: `"<name> (<os version>)"`.
    pub fn title(&self) -> String {
        format!("{} ({})", self.name, self.os.version)
    }
}

/// A device entry exactly as simctl reports it (no OS yet).
#[derive(Debug, Deserialize)]
struct RawDevice {
    udid: String,
    #[serde(rename = "isAvailable", default = "available_by_default")]
    is_available: bool,
    state: String,
    name: String,
    #[serde(rename = "dataPath", default)]
    data_path: PathBuf,
    #[serde(rename = "deviceTypeIdentifier")]
    device_type: Option<String>,
}

fn available_by_default() -> bool {
    true
}

impl RawDevice {
    fn with_os(self, os: OperatingSystem) -> DeviceRecord {
        DeviceRecord {
            os,
            udid: self.udid,
            is_available: self.is_available,
            state: self.state,
            name: self.name,
            data_path: self.data_path,
            device_type: self.device_type,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeviceList {
    devices: IndexMap<String, Vec<RawDevice>>,
}

/// Devices sharing one OS name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceGroup {
    #[serde(rename = "os")]
    pub os_name: String,
    pub devices: Vec<DeviceRecord>,
}

/// Devices grouped by OS name.
///
/// Groups appear in the order their OS name was first seen; devices keep
/// their source order. Versions are not part of the grouping key, so iOS 15.5
/// and iOS 16.2 devices share the "iOS" group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupedCatalog {
    groups: Vec<DeviceGroup>,
}

impl GroupedCatalog {
    pub fn groups(&self) -> &[DeviceGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of devices across all groups.
    pub fn len_devices(&self) -> usize {
        self.groups.iter().map(|g| g.devices.len()).sum()
    }

    /// Device at a flat position, counting across groups in display order.
    pub fn get(&self, index: usize) -> Option<&DeviceRecord> {
        self.devices().nth(index)
    }

    /// Iterates every device in display order.
    pub fn devices(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.groups.iter().flat_map(|g| g.devices.iter())
    }

    pub fn find(&self, udid: &str) -> Option<&DeviceRecord> {
        self.devices().find(|d| d.udid == udid)
    }
}

/// Parses simctl's device listing into a flat list of records.
///
/// Records are emitted in runtime key order, then in array order.
///
/// # Errors
///
/// - [`CatalogError::Json`] if the document is not valid or lacks `devices`
/// - [`CatalogError::RuntimeKey`] if any runtime key is malformed
pub fn parse_devices(json: &[u8]) -> Result<Vec<DeviceRecord>, CatalogError> {
    let list: DeviceList = serde_json::from_slice(json)?;

    let mut records = Vec::new();
    for (key, raw) in list.devices {
        let os = derive_os(&key).map_err(|source| CatalogError::RuntimeKey {
            key: key.clone(),
            source,
        })?;
        debug!(%key, os = %os, count = raw.len(), "runtime parsed");
        records.extend(raw.into_iter().map(|d| d.with_os(os.clone())));
    }
    Ok(records)
}

/// Folds records into groups keyed by OS name.
pub fn group(records: Vec<DeviceRecord>) -> GroupedCatalog {
    let mut groups: Vec<DeviceGroup> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|g| g.os_name == record.os.name) {
            Some(group) => group.devices.push(record),
            None => groups.push(DeviceGroup {
                os_name: record.os.name.clone(),
                devices: vec![record],
            }),
        }
    }
    GroupedCatalog { groups }
}

/// Parses and groups a raw listing.
pub fn from_json(json: &[u8]) -> Result<GroupedCatalog, CatalogError> {
    parse_devices(json).map(group)
}

/// Lists the available devices through simctl and groups them.
///
/// Blocks for the duration of the simctl call.
pub fn load(simctl: &Simctl) -> Result<GroupedCatalog, CatalogError> {
    let json = simctl.list_available()?;
    let catalog = from_json(&json)?;
    info!(
        groups = catalog.groups().len(),
        devices = catalog.len_devices(),
        "catalog loaded"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sample JSON matching actual simctl output format
    const SAMPLE_DEVICE_LIST: &str = r#"{
        "devices": {
            "com.apple.CoreSimulator.SimRuntime.iOS-17-0": [
                {
                    "udid": "A1B2C3D4-E5F6-7890-ABCD-EF1234567890",
                    "isAvailable": true,
                    "state": "Booted",
                    "name": "iPhone 15 Pro",
                    "dataPath": "/Users/dev/Library/Developer/CoreSimulator/Devices/A1B2C3D4-E5F6-7890-ABCD-EF1234567890/data",
                    "deviceTypeIdentifier": "com.apple.CoreSimulator.SimDeviceType.iPhone-15-Pro"
                },
                {
                    "udid": "B2C3D4E5-F6A7-8901-BCDE-F12345678901",
                    "isAvailable": true,
                    "state": "Shutdown",
                    "name": "iPhone 15",
                    "dataPath": "/Users/dev/Library/Developer/CoreSimulator/Devices/B2C3D4E5-F6A7-8901-BCDE-F12345678901/data"
                }
            ],
            "com.apple.CoreSimulator.SimRuntime.watchOS-10-0": [
                {
                    "udid": "D4E5F6A7-B8C9-0123-DEF0-234567890123",
                    "isAvailable": true,
                    "state": "Shutdown",
                    "name": "Apple Watch Series 9 (45mm)",
                    "dataPath": "/tmp/watch"
                }
            ],
            "com.apple.CoreSimulator.SimRuntime.iOS-16-4": [
                {
                    "udid": "C3D4E5F6-A7B8-9012-CDEF-123456789012",
                    "isAvailable": true,
                    "state": "Shutdown",
                    "name": "iPhone 14",
                    "dataPath": "/tmp/iphone14"
                }
            ]
        }
    }"#;

    fn udids(group: &DeviceGroup) -> Vec<&str> {
        group.devices.iter().map(|d| d.udid.as_str()).collect()
    }

    #[test]
    fn test_parse_preserves_key_order() {
        let records = parse_devices(SAMPLE_DEVICE_LIST.as_bytes()).unwrap();
        let names: Vec<&str> = records.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            ["iPhone 15 Pro", "iPhone 15", "Apple Watch Series 9 (45mm)", "iPhone 14"]
        );
    }

    #[test]
    fn test_parse_attaches_os() {
        let records = parse_devices(SAMPLE_DEVICE_LIST.as_bytes()).unwrap();
        assert_eq!(records[0].os.name, "iOS");
        assert_eq!(records[0].os.version, "17.0");
        assert_eq!(records[2].os.name, "watchOS");
        assert_eq!(records[3].os.version, "16.4");
    }

    #[test]
    fn test_parse_fields() {
        let records = parse_devices(SAMPLE_DEVICE_LIST.as_bytes()).unwrap();
        let pro = &records[0];
        assert_eq!(pro.udid, "A1B2C3D4-E5F6-7890-ABCD-EF1234567890");
        assert!(pro.is_available);
        assert!(pro.is_booted());
        assert!(pro.data_path.ends_with("data"));
        assert!(pro.device_type.as_deref().unwrap().contains("iPhone-15-Pro"));
        assert!(records[1].device_type.is_none());
        assert_eq!(pro.title(), "iPhone 15 Pro (17.0)");
    }

    #[test]
    fn test_group_by_first_seen_name() {
        let catalog = from_json(SAMPLE_DEVICE_LIST.as_bytes()).unwrap();
        let names: Vec<&str> = catalog.groups().iter().map(|g| g.os_name.as_str()).collect();
        assert_eq!(names, ["iOS", "watchOS"]);

        // iOS 16.4 joins the iOS group after the 17.0 devices.
        assert_eq!(
            udids(&catalog.groups()[0]),
            [
                "A1B2C3D4-E5F6-7890-ABCD-EF1234567890",
                "B2C3D4E5-F6A7-8901-BCDE-F12345678901",
                "C3D4E5F6-A7B8-9012-CDEF-123456789012",
            ]
        );
        assert_eq!(catalog.len_devices(), 4);
    }

    #[test]
    fn test_same_name_different_versions_share_group() {
        let json = r#"{"devices": {
            "com.apple.CoreSimulator.SimRuntime.iOS-15-5": [
                {"udid": "one", "isAvailable": true, "state": "Shutdown", "name": "iPhone 8", "dataPath": "/a"}
            ],
            "com.apple.CoreSimulator.SimRuntime.iOS-16-2": [
                {"udid": "two", "isAvailable": true, "state": "Shutdown", "name": "iPhone 14", "dataPath": "/b"}
            ]
        }}"#;
        let catalog = from_json(json.as_bytes()).unwrap();
        assert_eq!(catalog.groups().len(), 1);
        let ios = &catalog.groups()[0];
        assert_eq!(ios.os_name, "iOS");
        assert_eq!(udids(ios), ["one", "two"]);
        assert_eq!(ios.devices[0].os.version, "15.5");
        assert_eq!(ios.devices[1].os.version, "16.2");
    }

    #[test]
    fn test_group_is_stable() {
        let os = |name: &str| OperatingSystem { name: name.into(), version: "1.0".into() };
        let record = |udid: &str, name: &str| DeviceRecord {
            os: os(name),
            udid: udid.into(),
            is_available: true,
            state: "Shutdown".into(),
            name: udid.into(),
            data_path: PathBuf::new(),
            device_type: None,
        };

        let catalog = group(vec![
            record("a", "tvOS"),
            record("b", "iOS"),
            record("c", "tvOS"),
            record("d", "watchOS"),
            record("e", "iOS"),
        ]);

        let names: Vec<&str> = catalog.groups().iter().map(|g| g.os_name.as_str()).collect();
        assert_eq!(names, ["tvOS", "iOS", "watchOS"]);
        assert_eq!(udids(&catalog.groups()[0]), ["a", "c"]);
        assert_eq!(udids(&catalog.groups()[1]), ["b", "e"]);
        assert_eq!(udids(&catalog.groups()[2]), ["d"]);
    }

    #[test]
    fn test_group_empty() {
        let catalog = group(Vec::new());
        assert!(catalog.is_empty());
        assert_eq!(catalog.len_devices(), 0);
        assert!(catalog.get(0).is_none());
    }

    #[test]
    fn test_empty_device_list() {
        let catalog = from_json(br#"{"devices": {}}"#).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_runtime_with_no_devices_adds_no_group() {
        let catalog = from_json(br#"{"devices": {"com.apple.CoreSimulator.SimRuntime.tvOS-17-0": []}}"#).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        match from_json(b"not valid json") {
            Err(CatalogError::Json(_)) => {}
            other => panic!("Expected Json error, got: {:?}", other),
        }
    }

    #[test]
    fn test_missing_devices_key() {
        assert!(matches!(from_json(br#"{"something_else": []}"#), Err(CatalogError::Json(_))));
    }

    #[test]
    fn test_malformed_runtime_key() {
        let json = br#"{"devices": {"com.apple.CoreSimulator.SimRuntime.iOS": []}}"#;
        match from_json(json) {
            Err(CatalogError::RuntimeKey { key, source }) => {
                assert_eq!(key, "com.apple.CoreSimulator.SimRuntime.iOS");
                assert!(matches!(source, RuntimeKeyError::MissingVersion(_)));
            }
            other => panic!("Expected RuntimeKey error, got: {:?}", other),
        }
    }

    #[test]
    fn test_lookup_helpers() {
        let catalog = from_json(SAMPLE_DEVICE_LIST.as_bytes()).unwrap();
        assert_eq!(catalog.get(2).unwrap().name, "iPhone 14");
        assert_eq!(catalog.get(3).unwrap().os.name, "watchOS");
        assert!(catalog.get(4).is_none());
        assert_eq!(
            catalog.find("D4E5F6A7-B8C9-0123-DEF0-234567890123").unwrap().name,
            "Apple Watch Series 9 (45mm)"
        );
        assert!(catalog.find("nope").is_none());
    }

    #[test]
    fn test_serialize_catalog() {
        let catalog = from_json(SAMPLE_DEVICE_LIST.as_bytes()).unwrap();
        let value = serde_json::to_value(&catalog).unwrap();
        assert_eq!(value[0]["os"], "iOS");
        assert_eq!(value[0]["devices"][0]["udid"], "A1B2C3D4-E5F6-7890-ABCD-EF1234567890");
        assert_eq!(value[0]["devices"][0]["os"]["version"], "17.0");
        assert_eq!(value[1]["os"], "watchOS");
    }
}
