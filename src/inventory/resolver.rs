//! Relationship resolver
//!
//! Pure functions over the snapshot that collapse arbitrary device-ID lists
//! into their topological roots: top-level devices for the parent/child view,
//! canonical mesh sources for the mesh views and health checks.

use std::collections::HashSet;

use crate::models::Snapshot;

/// Filter `ids` down to devices that are not children.
///
/// Children render nested under their parents, so they never appear at the
/// top level even when explicitly passed in. Unknown IDs are dropped.
pub fn resolve_hierarchy_roots(snapshot: &Snapshot, ids: &[String]) -> Vec<String> {
    ids.iter()
        .filter(|id| {
            snapshot
                .devices
                .get(id.as_str())
                .is_some_and(|device| !device.is_child)
        })
        .cloned()
        .collect()
}

/// Collapse any mix of source/remote device IDs into the canonical set of
/// mesh source roots, first appearance order, deduplicated.
///
/// A mesh-index key maps to itself (this keeps dangling sources stable, so
/// the function is idempotent); a mesh remote maps to its source; anything
/// else contributes nothing.
pub fn resolve_mesh_sources(snapshot: &Snapshot, ids: &[String]) -> Vec<String> {
    let mut sources = Vec::new();
    let mut seen = HashSet::new();

    for id in ids {
        let source = if snapshot.mesh_index.contains_key(id) {
            Some(id.clone())
        } else {
            snapshot
                .devices
                .get(id)
                .filter(|device| device.is_mesh_linked)
                .and_then(|device| device.source_device_id.clone())
        };

        if let Some(source) = source {
            if seen.insert(source.clone()) {
                sources.push(source);
            }
        }
    }

    sources
}
