//! Issue categories for inventory health checks
//!
//! The category set and its order are fixed: report grouping, the exclusion
//! configuration, and webhook selection are all keyed by category.

use serde::{Deserialize, Serialize};

/// The six health-check categories, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    #[serde(rename = "lowBattery")]
    LowBattery,
    #[serde(rename = "inactiveDevices")]
    InactiveDevices,
    #[serde(rename = "offlineDevices")]
    OfflineDevices,
    #[serde(rename = "hubMesh_orphanedDevices")]
    MeshOrphanedDevices,
    #[serde(rename = "hubMesh_disabledOnSourceDevice")]
    MeshDisabledOnSourceDevice,
    #[serde(rename = "hubMesh_noRemoteDevice")]
    MeshNoRemoteDevice,
}

impl IssueCategory {
    /// All categories in report order.
    pub const ALL: [IssueCategory; 6] = [
        IssueCategory::LowBattery,
        IssueCategory::InactiveDevices,
        IssueCategory::OfflineDevices,
        IssueCategory::MeshOrphanedDevices,
        IssueCategory::MeshDisabledOnSourceDevice,
        IssueCategory::MeshNoRemoteDevice,
    ];

    /// Wire name, used in the persisted config and webhook payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::LowBattery => "lowBattery",
            IssueCategory::InactiveDevices => "inactiveDevices",
            IssueCategory::OfflineDevices => "offlineDevices",
            IssueCategory::MeshOrphanedDevices => "hubMesh_orphanedDevices",
            IssueCategory::MeshDisabledOnSourceDevice => "hubMesh_disabledOnSourceDevice",
            IssueCategory::MeshNoRemoteDevice => "hubMesh_noRemoteDevice",
        }
    }

    /// Human-readable heading for reports.
    pub fn title(&self) -> &'static str {
        match self {
            IssueCategory::LowBattery => "Low Battery",
            IssueCategory::InactiveDevices => "Inactive Devices",
            IssueCategory::OfflineDevices => "Offline Devices",
            IssueCategory::MeshOrphanedDevices => "Hub Mesh: Orphaned Remote Devices",
            IssueCategory::MeshDisabledOnSourceDevice => "Hub Mesh: Disabled On Source Device",
            IssueCategory::MeshNoRemoteDevice => "Hub Mesh: No Remote Device",
        }
    }
}
