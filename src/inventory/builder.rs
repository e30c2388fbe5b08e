//! Inventory builder
//!
//! Walks one hub's raw device tree and produces normalized Hub, Device and
//! App records plus this hub's mesh reverse-index contributions. Children
//! nest arbitrarily; a malformed node is skipped, never fatal to the hub.

use crate::config::HUB_MESH_SOURCE_MARKER;
use crate::models::{composite_key, App, Device, Hub, Protocol, Snapshot};
use crate::poller::{RawDevice, RawHubDetails};

/// Per-hub build tally, reported to the operator after each hub.
#[derive(Debug, Default, Clone, Copy)]
pub struct HubBuildStats {
    pub devices: usize,
    pub apps: usize,
    pub skipped: usize,
}

/// Merge one hub's poll payloads into the snapshot.
///
/// The caller is responsible for having wiped this hub's prior records; the
/// builder only inserts.
pub fn build_hub(
    snapshot: &mut Snapshot,
    hub_ip: &str,
    details: &RawHubDetails,
    tree: Vec<serde_json::Value>,
) -> HubBuildStats {
    snapshot.hubs.insert(
        hub_ip.to_string(),
        Hub {
            ip: hub_ip.to_string(),
            name: details.name.clone(),
            platform_version: details.platform_version.clone(),
            hardware_version: details.hardware_version.clone(),
        },
    );

    let mut stats = HubBuildStats::default();
    for node in tree {
        build_node(snapshot, hub_ip, node, None, &mut stats);
    }
    stats
}

/// Build one device node and, first, its children. Returns the device's
/// global ID, or `None` when the node was malformed and skipped.
fn build_node(
    snapshot: &mut Snapshot,
    hub_ip: &str,
    node: serde_json::Value,
    parent_id: Option<&str>,
    stats: &mut HubBuildStats,
) -> Option<String> {
    let raw = match RawDevice::from_value(node) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Skipping malformed device node on hub {}: {}", hub_ip, e);
            stats.skipped += 1;
            return None;
        }
    };

    let device_id = composite_key(hub_ip, &raw.id.to_string());

    // Children are built before the parent so the child-ID list is taken
    // from records that actually made it into the snapshot.
    let mut child_ids = Vec::new();
    for child in raw.children {
        if let Some(child_id) = build_node(snapshot, hub_ip, child, Some(&device_id), stats) {
            child_ids.push(child_id);
        }
    }

    // First matching protocol flag wins; none set means a LAN/virtual device.
    let protocol = if raw.zigbee {
        Some(Protocol::Zigbee)
    } else if raw.zwave {
        Some(Protocol::ZWave)
    } else if raw.matter {
        Some(Protocol::Matter)
    } else {
        None
    };

    let mut in_use_by = Vec::new();
    for app in &raw.in_use_by {
        let app_id = composite_key(hub_ip, &app.id.to_string());
        // Lazy creation: the first device that reports the app wins, later
        // sightings must not overwrite the record.
        if !snapshot.apps.contains_key(&app_id) {
            snapshot.apps.insert(
                app_id.clone(),
                App {
                    id: app_id.clone(),
                    hub_ip: hub_ip.to_string(),
                    name: app.name.clone(),
                    label: strip_label_markup(app.label.as_deref().unwrap_or(&app.name)),
                    disabled: app.disabled,
                    config_path: format!("/installedapp/configure/{}", app.id),
                },
            );
            stats.apps += 1;
        }
        in_use_by.push(app_id);
    }

    let is_mesh_linked = raw.source.as_deref() == Some(HUB_MESH_SOURCE_MARKER);
    let mut source_device_id = None;
    if is_mesh_linked {
        match raw.source_url.as_deref().and_then(parse_source_device_id) {
            Some(source_id) => {
                snapshot
                    .mesh_index
                    .entry(source_id.clone())
                    .or_default()
                    .push(device_id.clone());
                source_device_id = Some(source_id);
            }
            None => {
                tracing::warn!(
                    "Mesh remote {} has no parseable source URL ({:?})",
                    device_id,
                    raw.source_url
                );
            }
        }
    }

    if raw.hub_mesh_enabled {
        // Ensure-entry distinguishes "source with zero remotes" from
        // "not a mesh source at all".
        snapshot.mesh_index.entry(device_id.clone()).or_default();
    }

    let parent_device_id = parent_id.map(str::to_string).or_else(|| {
        raw.parent_device_id
            .map(|pid| composite_key(hub_ip, &pid.to_string()))
    });

    let device = Device {
        id: device_id.clone(),
        hub_ip: hub_ip.to_string(),
        name: raw.name,
        edit_path: format!("/device/edit/{}", raw.id),
        disabled: raw.disabled,
        last_activity: raw.last_activity_time,
        protocol,
        battery: raw.battery,
        in_use_by,
        is_parent: !child_ids.is_empty(),
        is_child: parent_device_id.is_some(),
        is_mesh_linked,
        mesh_source_enabled: raw.hub_mesh_enabled,
        source_device_id,
        child_ids,
        parent_device_id,
    };

    snapshot.devices.insert(device_id.clone(), device);
    stats.devices += 1;
    Some(device_id)
}

/// Derive a source device's global ID from its remote-device URL.
///
/// The scheme prefix is stripped; the hub address is the first path segment
/// and the local ID is the final one:
/// `http://192.168.1.5/device/edit/12` -> `192.168.1.5-12`.
fn parse_source_device_id(url: &str) -> Option<String> {
    let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let mut segments = rest.split('/').filter(|s| !s.is_empty());
    let hub = segments.next()?;
    let local_id = segments.last()?;
    Some(composite_key(hub, local_id))
}

/// Strip paused/stopped markup suffixes from an app label.
///
/// Hubs decorate labels of paused automations with trailing markup
/// (`Night Mode <span ...>(paused)</span>`); everything from the first tag
/// onward is display noise.
pub fn strip_label_markup(label: &str) -> String {
    match label.find('<') {
        Some(pos) => label[..pos].trim_end().to_string(),
        None => label.trim_end().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::RawHubDetails;
    use serde_json::json;

    fn details(name: &str) -> RawHubDetails {
        serde_json::from_value(json!({ "name": name, "platformVersion": "2.4.1" })).unwrap()
    }

    #[test]
    fn builds_nested_children_before_parent() {
        let mut snapshot = Snapshot::default();
        let tree = vec![json!({
            "id": 1,
            "name": "Multi Sensor",
            "zigbee": true,
            "children": [
                { "id": 2, "name": "Multi Sensor - Temp" },
                { "id": 3, "name": "Multi Sensor - Motion",
                  "children": [ { "id": 4, "name": "Deep Child" } ] }
            ]
        })];

        let stats = build_hub(&mut snapshot, "192.168.1.5", &details("Main Hub"), tree);
        assert_eq!(stats.devices, 4);
        assert_eq!(stats.skipped, 0);

        let parent = &snapshot.devices["192.168.1.5-1"];
        assert!(parent.is_parent);
        assert!(!parent.is_child);
        assert_eq!(parent.child_ids, vec!["192.168.1.5-2", "192.168.1.5-3"]);

        let child = &snapshot.devices["192.168.1.5-3"];
        assert!(child.is_child);
        assert!(child.is_parent);
        assert_eq!(child.parent_device_id.as_deref(), Some("192.168.1.5-1"));

        let deep = &snapshot.devices["192.168.1.5-4"];
        assert_eq!(deep.parent_device_id.as_deref(), Some("192.168.1.5-3"));
    }

    #[test]
    fn malformed_node_is_skipped_not_fatal() {
        let mut snapshot = Snapshot::default();
        let tree = vec![
            json!({ "name": "missing id" }),
            json!({ "id": 7, "name": "Good Device" }),
        ];
        let stats = build_hub(&mut snapshot, "10.0.0.2", &details("Hub B"), tree);
        assert_eq!(stats.devices, 1);
        assert_eq!(stats.skipped, 1);
        assert!(snapshot.devices.contains_key("10.0.0.2-7"));
    }

    #[test]
    fn protocol_derivation_first_match_wins() {
        let mut snapshot = Snapshot::default();
        let tree = vec![
            json!({ "id": 1, "name": "Z", "zigbee": true, "zwave": true }),
            json!({ "id": 2, "name": "W", "zwave": true, "matter": true }),
            json!({ "id": 3, "name": "M", "matter": true }),
            json!({ "id": 4, "name": "Virtual" }),
        ];
        build_hub(&mut snapshot, "h", &details("Hub"), tree);

        assert_eq!(snapshot.devices["h-1"].protocol, Some(Protocol::Zigbee));
        assert_eq!(snapshot.devices["h-2"].protocol, Some(Protocol::ZWave));
        assert_eq!(snapshot.devices["h-3"].protocol, Some(Protocol::Matter));
        assert_eq!(snapshot.devices["h-4"].protocol, None);
    }

    #[test]
    fn apps_are_created_lazily_and_never_overwritten() {
        let mut snapshot = Snapshot::default();
        let tree = vec![
            json!({ "id": 1, "name": "Lamp", "inUseBy": [
                { "id": 90, "name": "Night Mode", "label": "Night Mode <span class=\"paused\">(paused)</span>" }
            ]}),
            json!({ "id": 2, "name": "Other Lamp", "inUseBy": [
                { "id": 90, "name": "Renamed Should Not Win", "label": "Other Label" }
            ]}),
        ];
        build_hub(&mut snapshot, "h", &details("Hub"), tree);

        assert_eq!(snapshot.apps.len(), 1);
        let app = &snapshot.apps["h-90"];
        assert_eq!(app.name, "Night Mode");
        assert_eq!(app.label, "Night Mode");
        assert_eq!(snapshot.devices["h-1"].in_use_by, vec!["h-90"]);
        assert_eq!(snapshot.devices["h-2"].in_use_by, vec!["h-90"]);
    }

    #[test]
    fn mesh_remote_appends_to_reverse_index() {
        let mut snapshot = Snapshot::default();
        let tree = vec![
            json!({ "id": 10, "name": "Porch Light", "source": "Linked",
                    "sourceUrl": "http://192.168.1.5/device/edit/12" }),
            json!({ "id": 11, "name": "Porch Light Too", "source": "Linked",
                    "sourceUrl": "http://192.168.1.5/device/edit/12" }),
        ];
        build_hub(&mut snapshot, "192.168.1.6", &details("Hub B"), tree);

        let remotes = &snapshot.mesh_index["192.168.1.5-12"];
        assert_eq!(remotes, &vec!["192.168.1.6-10", "192.168.1.6-11"]);
        let remote = &snapshot.devices["192.168.1.6-10"];
        assert!(remote.is_mesh_linked);
        assert_eq!(remote.source_device_id.as_deref(), Some("192.168.1.5-12"));
    }

    #[test]
    fn mesh_marker_match_is_case_sensitive() {
        let mut snapshot = Snapshot::default();
        let tree = vec![json!({ "id": 10, "name": "Lamp", "source": "linked",
                                "sourceUrl": "http://192.168.1.5/device/edit/12" })];
        build_hub(&mut snapshot, "h", &details("Hub"), tree);
        assert!(!snapshot.devices["h-10"].is_mesh_linked);
        assert!(snapshot.mesh_index.is_empty());
    }

    #[test]
    fn mesh_source_gets_empty_index_entry() {
        let mut snapshot = Snapshot::default();
        let tree = vec![json!({ "id": 12, "name": "Shared Lamp", "hubMeshEnabled": true })];
        build_hub(&mut snapshot, "192.168.1.5", &details("Hub A"), tree);

        assert_eq!(snapshot.mesh_index.get("192.168.1.5-12"), Some(&Vec::new()));
        assert!(snapshot.devices["192.168.1.5-12"].mesh_source_enabled);
    }

    #[test]
    fn parse_source_device_id_strips_scheme_and_path() {
        assert_eq!(
            parse_source_device_id("http://192.168.1.5/device/edit/12").as_deref(),
            Some("192.168.1.5-12")
        );
        assert_eq!(
            parse_source_device_id("https://10.0.0.9/device/edit/seg/440").as_deref(),
            Some("10.0.0.9-440")
        );
        assert_eq!(parse_source_device_id("http://192.168.1.5"), None);
        assert_eq!(parse_source_device_id(""), None);
    }

    #[test]
    fn strip_label_markup_cases() {
        assert_eq!(strip_label_markup("Night Mode"), "Night Mode");
        assert_eq!(
            strip_label_markup("Night Mode <span>(paused)</span>"),
            "Night Mode"
        );
        assert_eq!(strip_label_markup("Trailing  "), "Trailing");
    }
}
