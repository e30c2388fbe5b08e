//! Data models for the cross-hub inventory snapshot

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

/// Composite device/app key: hub-local IDs are only unique within a hub, so
/// the hub address is part of every global key.
pub fn composite_key(hub_ip: &str, local_id: &str) -> String {
    format!("{hub_ip}-{local_id}")
}

/// True when a composite key belongs to the given hub address.
pub fn key_belongs_to_hub(key: &str, hub_ip: &str) -> bool {
    key.strip_prefix(hub_ip)
        .is_some_and(|rest| rest.starts_with('-'))
}

/// Wireless protocol of a device. LAN/virtual devices carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Protocol {
    Zigbee,
    ZWave,
    Matter,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Zigbee => "Zigbee",
            Protocol::ZWave => "Z-Wave",
            Protocol::Matter => "Matter",
        }
    }
}

/// One hub controller, keyed by IP address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hub {
    pub ip: String,
    pub name: String,
    #[serde(default)]
    pub platform_version: Option<String>,
    #[serde(default)]
    pub hardware_version: Option<String>,
}

/// One device record, keyed by `{hubIP}-{localID}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub hub_ip: String,
    pub name: String,
    /// Hub-relative edit path; the display layer prefixes scheme and hub.
    pub edit_path: String,
    pub disabled: bool,
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub protocol: Option<Protocol>,
    /// Battery charge percent; only meaningful when the device exposes a
    /// battery attribute.
    #[serde(default)]
    pub battery: Option<i64>,
    /// App IDs of automations using this device.
    #[serde(default)]
    pub in_use_by: Vec<String>,
    #[serde(default)]
    pub is_parent: bool,
    #[serde(default)]
    pub is_child: bool,
    /// This device is a remote proxy of a device on another hub.
    #[serde(default)]
    pub is_mesh_linked: bool,
    /// This device is shared to other hubs as a mesh source.
    #[serde(default)]
    pub mesh_source_enabled: bool,
    /// Set only when `is_mesh_linked`.
    #[serde(default)]
    pub source_device_id: Option<String>,
    /// Set only when `is_parent`.
    #[serde(default)]
    pub child_ids: Vec<String>,
    /// Set only when `is_child`.
    #[serde(default)]
    pub parent_device_id: Option<String>,
}

/// One app/automation record, keyed by `{hubIP}-{localID}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    pub id: String,
    pub hub_ip: String,
    pub name: String,
    /// Display label with paused/stopped markup suffixes stripped.
    pub label: String,
    pub disabled: bool,
    /// Hub-relative configuration path.
    pub config_path: String,
}

/// Result of looking a device ID up in the snapshot.
///
/// `Dangling` covers IDs that appear in the mesh reverse index without a
/// backing device record: a mesh source deleted from its hub while remote
/// proxies persist, or a hub never included in the current scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceLookup<'a> {
    Resolved(&'a Device),
    Dangling(&'a str),
    NotFound,
}

impl<'a> DeviceLookup<'a> {
    pub fn resolved(&self) -> Option<&'a Device> {
        match self {
            DeviceLookup::Resolved(device) => Some(device),
            _ => None,
        }
    }
}

/// The whole reconciled inventory: one wholesale-replaceable document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub hubs: BTreeMap<String, Hub>,
    pub devices: BTreeMap<String, Device>,
    pub apps: BTreeMap<String, App>,
    /// Mesh reverse index: source device ID -> ordered remote device IDs.
    /// An empty list is a valid state distinct from an absent key.
    pub mesh_index: BTreeMap<String, Vec<String>>,
    pub config: AppConfig,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    /// Name-sorted iteration orders, rebuilt by `sort_collections` after
    /// every scan and every load. Not persisted.
    #[serde(skip)]
    device_order: Vec<String>,
    #[serde(skip)]
    hub_order: Vec<String>,
}

impl Snapshot {
    /// Tri-state device lookup. An ID present only as a mesh-index key is a
    /// dangling reference, not an error.
    pub fn lookup_device<'a>(&'a self, id: &'a str) -> DeviceLookup<'a> {
        if let Some(device) = self.devices.get(id) {
            return DeviceLookup::Resolved(device);
        }
        if self.mesh_index.contains_key(id) {
            return DeviceLookup::Dangling(id);
        }
        DeviceLookup::NotFound
    }

    /// Rebuild the name-sorted iteration orders. Case-sensitive ordinal
    /// ordering on the display name, ID as tie-breaker.
    pub fn sort_collections(&mut self) {
        let mut devices: Vec<(&String, &Device)> = self.devices.iter().collect();
        devices.sort_by(|a, b| a.1.name.cmp(&b.1.name).then_with(|| a.0.cmp(b.0)));
        self.device_order = devices.into_iter().map(|(id, _)| id.clone()).collect();

        let mut hubs: Vec<(&String, &Hub)> = self.hubs.iter().collect();
        hubs.sort_by(|a, b| a.1.name.cmp(&b.1.name).then_with(|| a.0.cmp(b.0)));
        self.hub_order = hubs.into_iter().map(|(ip, _)| ip.clone()).collect();
    }

    /// Devices in name-sorted order.
    pub fn iter_devices(&self) -> impl Iterator<Item = &Device> {
        self.device_order
            .iter()
            .filter_map(move |id| self.devices.get(id))
    }

    /// Device IDs in name-sorted order.
    pub fn device_ids(&self) -> Vec<String> {
        self.device_order.clone()
    }

    /// Hubs in name-sorted order.
    pub fn iter_hubs(&self) -> impl Iterator<Item = &Hub> {
        self.hub_order
            .iter()
            .filter_map(move |ip| self.hubs.get(ip))
    }

    /// Remove one hub and everything it owns. Mesh-index keys are kept even
    /// when their source device goes away; other hubs' remotes still point at
    /// them (see `prune_mesh_index`). Only this hub's remote entries are
    /// stripped from the lists.
    pub fn remove_hub(&mut self, hub_ip: &str) {
        self.hubs.remove(hub_ip);
        self.devices.retain(|_, d| d.hub_ip != hub_ip);
        self.apps.retain(|_, a| a.hub_ip != hub_ip);
        for remotes in self.mesh_index.values_mut() {
            remotes.retain(|id| !key_belongs_to_hub(id, hub_ip));
        }
    }

    /// Drop mesh-index entries that are empty and whose source device no
    /// longer exists anywhere. An empty entry with a live source device stays:
    /// that is the "mesh source with zero remotes" state.
    pub fn prune_mesh_index(&mut self) {
        let devices = &self.devices;
        self.mesh_index
            .retain(|source, remotes| !remotes.is_empty() || devices.contains_key(source));
    }
}
