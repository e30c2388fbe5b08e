//! Display-ready record structures
//!
//! Everything a renderer needs is resolved here: absolute URLs, hub names,
//! app labels, nested children, mesh source labels with an explicit marker
//! for dangling sources, and per-category suppressed counts.

use chrono::{DateTime, Utc};

use crate::inventory::{resolve_hierarchy_roots, resolve_mesh_sources};
use crate::issues::{IssueCategory, IssueReport};
use crate::models::{Device, DeviceLookup, Snapshot};

/// Placeholder for entities referenced but absent from the snapshot.
pub const MISSING_LABEL: &str = "(missing)";

/// One device line, with children nested for the hierarchy view.
#[derive(Debug, Clone)]
pub struct DeviceRow {
    pub id: String,
    pub name: String,
    pub hub_name: String,
    pub url: String,
    pub protocol: Option<&'static str>,
    pub battery: Option<i64>,
    pub last_activity: Option<DateTime<Utc>>,
    pub disabled: bool,
    pub mesh_linked: bool,
    pub mesh_source: bool,
    /// Labels of the apps using this device; missing apps render as such.
    pub in_use_by: Vec<String>,
    pub children: Vec<DeviceRow>,
}

/// One hub line.
#[derive(Debug, Clone)]
pub struct HubRow {
    pub name: String,
    pub ip: String,
    pub url: String,
    pub platform_version: Option<String>,
    pub hardware_version: Option<String>,
}

/// One mesh source with its remote proxies.
#[derive(Debug, Clone)]
pub struct MeshGroup {
    pub source_id: String,
    /// Display name, or the missing marker for a dangling source.
    pub source_label: String,
    pub source_enabled: bool,
    pub dangling: bool,
    pub remotes: Vec<DeviceRow>,
}

/// One issue category section of the health report.
#[derive(Debug, Clone)]
pub struct IssueSection {
    pub category: IssueCategory,
    pub devices: Vec<DeviceRow>,
    pub suppressed: usize,
}

fn absolute_url(snapshot: &Snapshot, hub_ip: &str, path: &str) -> String {
    format!("{}://{}{}", snapshot.config.url_scheme, hub_ip, path)
}

fn make_row(snapshot: &Snapshot, device: &Device) -> DeviceRow {
    let hub_name = snapshot
        .hubs
        .get(&device.hub_ip)
        .map(|hub| hub.name.clone())
        .unwrap_or_else(|| device.hub_ip.clone());

    let in_use_by = device
        .in_use_by
        .iter()
        .map(|app_id| {
            snapshot
                .apps
                .get(app_id)
                .map(|app| app.label.clone())
                .unwrap_or_else(|| MISSING_LABEL.to_string())
        })
        .collect();

    let children = device
        .child_ids
        .iter()
        .filter_map(|child_id| snapshot.devices.get(child_id))
        .map(|child| make_row(snapshot, child))
        .collect();

    DeviceRow {
        id: device.id.clone(),
        name: device.name.clone(),
        hub_name,
        url: absolute_url(snapshot, &device.hub_ip, &device.edit_path),
        protocol: device.protocol.map(|p| p.as_str()),
        battery: device.battery,
        last_activity: device.last_activity,
        disabled: device.disabled,
        mesh_linked: device.is_mesh_linked,
        mesh_source: device.mesh_source_enabled,
        in_use_by,
        children,
    }
}

/// Hubs in name-sorted order.
pub fn hub_rows(snapshot: &Snapshot) -> Vec<HubRow> {
    snapshot
        .iter_hubs()
        .map(|hub| HubRow {
            name: hub.name.clone(),
            ip: hub.ip.clone(),
            url: absolute_url(snapshot, &hub.ip, "/"),
            platform_version: hub.platform_version.clone(),
            hardware_version: hub.hardware_version.clone(),
        })
        .collect()
}

/// Top-level devices in name-sorted order, children nested under parents.
pub fn device_rows(snapshot: &Snapshot) -> Vec<DeviceRow> {
    let roots = resolve_hierarchy_roots(snapshot, &snapshot.device_ids());
    roots
        .iter()
        .filter_map(|id| snapshot.devices.get(id))
        .map(|device| make_row(snapshot, device))
        .collect()
}

/// Mesh sources with their remotes, in first-appearance order over the
/// name-sorted device set.
pub fn mesh_groups(snapshot: &Snapshot) -> Vec<MeshGroup> {
    let sources = resolve_mesh_sources(snapshot, &snapshot.device_ids());
    sources
        .iter()
        .map(|source_id| {
            let remotes = snapshot
                .mesh_index
                .get(source_id)
                .map(Vec::as_slice)
                .unwrap_or_default()
                .iter()
                .filter_map(|remote_id| snapshot.devices.get(remote_id))
                .map(|remote| make_row(snapshot, remote))
                .collect();

            match snapshot.lookup_device(source_id) {
                DeviceLookup::Resolved(source) => MeshGroup {
                    source_id: source_id.clone(),
                    source_label: source.name.clone(),
                    source_enabled: source.mesh_source_enabled,
                    dangling: false,
                    remotes,
                },
                _ => MeshGroup {
                    source_id: source_id.clone(),
                    source_label: MISSING_LABEL.to_string(),
                    source_enabled: false,
                    dangling: true,
                    remotes,
                },
            }
        })
        .collect()
}

/// All six category sections in fixed order, devices sorted by name.
/// Suppressed counts are surfaced even when no devices are listed.
pub fn issue_sections(snapshot: &Snapshot, report: &IssueReport) -> Vec<IssueSection> {
    IssueCategory::ALL
        .iter()
        .map(|category| {
            let mut devices: Vec<DeviceRow> = report
                .devices_for(*category)
                .iter()
                .filter_map(|id| snapshot.devices.get(*id))
                .map(|device| make_row(snapshot, device))
                .collect();
            devices.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

            IssueSection {
                category: *category,
                devices,
                suppressed: report.suppressed.get(category).copied().unwrap_or(0),
            }
        })
        .collect()
}
