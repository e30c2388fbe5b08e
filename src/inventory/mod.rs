//! Inventory reconciliation
//!
//! The builder merges per-hub poll payloads into the snapshot; the scan
//! workflow drives validation, wipe and rebuild for a batch of hubs; the
//! resolver answers parent/child and mesh source/remote questions over the
//! merged graph.

pub mod builder;
pub mod resolver;
pub mod scan;

pub use builder::{build_hub, strip_label_markup, HubBuildStats};
pub use resolver::{resolve_hierarchy_roots, resolve_mesh_sources};
pub use scan::{finalize_scan, run_scan, wipe_batch, ScanOutcome};
