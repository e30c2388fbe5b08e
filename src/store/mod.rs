//! Snapshot persistence
//!
//! The whole inventory lives in one JSON document, read in full before any
//! query and written in full after any mutation. Writes go to a temp file
//! first and are renamed into place, so a crash mid-write never corrupts the
//! previous good snapshot.

use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Snapshot;

/// Load the snapshot document.
///
/// A missing file yields a default empty snapshot. The mandated name-sort
/// pass runs after every load, so iteration order never depends on how the
/// document was written.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        let mut snapshot = Snapshot::default();
        snapshot.sort_collections();
        return Ok(snapshot);
    }

    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;
    let mut snapshot: Snapshot = serde_json::from_str(&data)
        .with_context(|| format!("Malformed snapshot file {}", path.display()))?;
    snapshot.sort_collections();
    Ok(snapshot)
}

/// Persist the snapshot document atomically (write-then-rename).
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create snapshot directory {}", parent.display()))?;
        }
    }

    let data =
        serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = Path::new(&tmp_path);

    std::fs::write(tmp_path, data)
        .with_context(|| format!("Failed to write snapshot temp file {}", tmp_path.display()))?;
    std::fs::rename(tmp_path, path)
        .with_context(|| format!("Failed to move snapshot into place at {}", path.display()))?;

    Ok(())
}
