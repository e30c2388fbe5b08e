//! Issue classifier
//!
//! Evaluates the fixed rule battery over a device-ID set and the mesh
//! reverse index. Read-only over the snapshot; the ephemeral report is the
//! only thing produced. Notification is a separate concern (`crate::notify`).

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Duration, Utc};

use crate::config::AppConfig;
use crate::inventory::resolve_mesh_sources;
use crate::issues::IssueCategory;
use crate::models::{Device, DeviceLookup, Snapshot};

/// One classification pass: per-device triggered categories plus, per
/// category, how many devices the exclusion configuration suppressed.
#[derive(Debug, Clone)]
pub struct IssueReport {
    pub per_device: BTreeMap<String, BTreeSet<IssueCategory>>,
    pub suppressed: BTreeMap<IssueCategory, usize>,
}

impl IssueReport {
    fn empty() -> Self {
        let suppressed = IssueCategory::ALL.iter().map(|c| (*c, 0)).collect();
        Self {
            per_device: BTreeMap::new(),
            suppressed,
        }
    }

    /// Device IDs triggered for one category, in key order.
    pub fn devices_for(&self, category: IssueCategory) -> Vec<&str> {
        self.per_device
            .iter()
            .filter(|(_, categories)| categories.contains(&category))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Total number of triggered (non-suppressed) flags.
    pub fn total_flags(&self) -> usize {
        self.per_device.values().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.per_device.is_empty() && self.suppressed.values().all(|n| *n == 0)
    }
}

struct Classifier<'a> {
    config: &'a AppConfig,
    report: IssueReport,
    /// Guards the suppressed counters: one increment per (device, category)
    /// even when a rule reaches the same device through two paths.
    suppressed_seen: HashSet<(String, IssueCategory)>,
}

impl<'a> Classifier<'a> {
    fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            report: IssueReport::empty(),
            suppressed_seen: HashSet::new(),
        }
    }

    fn flag(&mut self, device_id: &str, category: IssueCategory) {
        if self.config.is_excluded(category, device_id) {
            if self
                .suppressed_seen
                .insert((device_id.to_string(), category))
            {
                *self.report.suppressed.entry(category).or_insert(0) += 1;
            }
            return;
        }
        // Set insertion makes re-flagging through a second path a no-op.
        self.report
            .per_device
            .entry(device_id.to_string())
            .or_default()
            .insert(category);
    }

    fn check_offline(&mut self, device: &Device) {
        if device.name.to_lowercase().starts_with("offline") {
            self.flag(&device.id, IssueCategory::OfflineDevices);
        }
    }
}

/// Classify `ids` against the snapshot at time `now`.
///
/// Unknown IDs are skipped; an empty input yields an empty report. Thresholds
/// and exclusions come from the snapshot's config.
pub fn classify(snapshot: &Snapshot, ids: &[String], now: DateTime<Utc>) -> IssueReport {
    let config = &snapshot.config;
    let mut classifier = Classifier::new(config);
    let inactivity_cutoff = Duration::minutes(config.inactivity_threshold_minutes);

    for id in ids {
        let Some(device) = snapshot.devices.get(id) else {
            continue;
        };

        classifier.check_offline(device);

        // Battery is only judged on the owning record, never on remote
        // proxies of it.
        if let Some(battery) = device.battery {
            if !device.is_mesh_linked && battery < config.low_battery_threshold {
                classifier.flag(&device.id, IssueCategory::LowBattery);
            }
        }

        // LAN/virtual devices have no radio to go quiet.
        if device.protocol.is_some() {
            if let Some(last_activity) = device.last_activity {
                if now - last_activity > inactivity_cutoff {
                    classifier.flag(&device.id, IssueCategory::InactiveDevices);
                }
            }
        }
    }

    for source_id in resolve_mesh_sources(snapshot, ids) {
        let remotes = snapshot
            .mesh_index
            .get(&source_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        match snapshot.lookup_device(&source_id) {
            DeviceLookup::Resolved(source) => {
                classifier.check_offline(source);
                if remotes.is_empty() {
                    classifier.flag(&source_id, IssueCategory::MeshNoRemoteDevice);
                } else if !source.mesh_source_enabled {
                    classifier.flag(&source_id, IssueCategory::MeshDisabledOnSourceDevice);
                }
            }
            DeviceLookup::Dangling(_) => {
                // Source deleted from its hub; every surviving remote proxy
                // is orphaned. The source itself has no record to flag.
                for remote_id in remotes {
                    classifier.flag(remote_id, IssueCategory::MeshOrphanedDevices);
                }
            }
            DeviceLookup::NotFound => {}
        }

        for remote_id in remotes {
            if let Some(remote) = snapshot.devices.get(remote_id) {
                classifier.check_offline(remote);
            }
        }
    }

    classifier.report
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod classifier_tests;
