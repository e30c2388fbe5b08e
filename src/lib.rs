//! hubaudit — Cross-Hub Device Inventory Auditor
//!
//! This crate reconciles device and app inventory from multiple
//! home-automation hub controllers reachable over HTTP:
//! - Address validation with liveness probes on the hub control ports
//! - Sequential per-hub polling of hub details and the nested device tree
//! - Cross-hub reconciliation of parent/child and hub-mesh relationships
//! - A fixed battery of health checks with per-category exclusions
//! - Terminal/HTML/CSV reports and optional webhook notifications
//! - One atomically-replaced JSON snapshot document for persistence

pub mod config;
pub mod inventory;
pub mod issues;
pub mod logging;
pub mod models;
pub mod network;
pub mod notify;
pub mod poller;
pub mod reports;
pub mod store;

pub use config::{default_snapshot_path, AppConfig, WebhookTarget};
pub use inventory::{
    build_hub, finalize_scan, resolve_hierarchy_roots, resolve_mesh_sources, run_scan,
    strip_label_markup, wipe_batch, HubBuildStats, ScanOutcome,
};
pub use issues::{classify, IssueCategory, IssueReport};
pub use models::{composite_key, App, Device, DeviceLookup, Hub, Protocol, Snapshot};
pub use network::{canonicalize_address, parse_hub_list, probe_hub_ports, validate_address};
pub use notify::notify_issues;
pub use poller::{
    fetch_device_tree, fetch_hub_details, new_http_client, RawApp, RawDevice, RawHubDetails,
};
pub use reports::{
    device_rows, export_devices_csv, export_issues_csv, hub_rows, issue_sections, mesh_groups,
    render_device_listing, render_html_report, render_hub_listing, render_issue_report,
    render_mesh_listing, DeviceRow, HubRow, IssueSection, MeshGroup,
};
pub use store::{load_snapshot, save_snapshot};

// Re-export logging macros for use across crate
pub use crate::logging::macros;
