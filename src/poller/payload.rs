//! Raw hub payload types
//!
//! Shapes of the JSON the hubs serve. These stay close to the wire; the
//! inventory builder turns them into snapshot records.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Hub-details payload from `/hub/api/details`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHubDetails {
    pub name: String,
    #[serde(default)]
    pub platform_version: Option<String>,
    #[serde(default)]
    pub hardware_version: Option<String>,
}

/// One device node from the device tree. Children nest arbitrarily and are
/// kept as raw JSON so one malformed child can be skipped in isolation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDevice {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub disabled: bool,
    /// Origin marker; the literal mesh marker identifies a remote proxy.
    #[serde(default)]
    pub source: Option<String>,
    /// URL of the source device, present on mesh remotes.
    #[serde(default)]
    pub source_url: Option<String>,
    /// This device is shared to other hubs as a mesh source.
    #[serde(default)]
    pub hub_mesh_enabled: bool,
    #[serde(default)]
    pub zigbee: bool,
    #[serde(default)]
    pub zwave: bool,
    #[serde(default)]
    pub matter: bool,
    #[serde(default)]
    pub last_activity_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub battery: Option<i64>,
    #[serde(default)]
    pub in_use_by: Vec<RawApp>,
    #[serde(default)]
    pub children: Vec<serde_json::Value>,
    #[serde(default)]
    pub parent_device_id: Option<u64>,
}

impl RawDevice {
    /// Parse one raw tree node.
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

/// One "in use by" app reference on a device node.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawApp {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_node_parses_with_defaults() {
        let node = json!({
            "id": 12,
            "name": "Porch Light",
            "zigbee": true
        });
        let device = RawDevice::from_value(node).unwrap();
        assert_eq!(device.id, 12);
        assert!(device.zigbee);
        assert!(!device.hub_mesh_enabled);
        assert!(device.children.is_empty());
        assert!(device.in_use_by.is_empty());
    }

    #[test]
    fn malformed_node_fails_in_isolation() {
        let node = json!({ "name": "No ID" });
        assert!(RawDevice::from_value(node).is_err());
    }

    #[test]
    fn mesh_remote_node_carries_source_fields() {
        let node = json!({
            "id": 44,
            "name": "Porch Light",
            "source": "Linked",
            "sourceUrl": "http://192.168.1.5/device/edit/12",
            "lastActivityTime": "2026-08-29T10:00:00Z"
        });
        let device = RawDevice::from_value(node).unwrap();
        assert_eq!(device.source.as_deref(), Some("Linked"));
        assert_eq!(
            device.source_url.as_deref(),
            Some("http://192.168.1.5/device/edit/12")
        );
        assert!(device.last_activity_time.is_some());
    }
}
