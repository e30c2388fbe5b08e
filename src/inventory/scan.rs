//! Scan workflow: validate, wipe, rebuild
//!
//! Hubs are polled one at a time in list order. The batch wipe fires on the
//! first address that proves reachable; until then the previous snapshot is
//! preserved untouched, so a batch where nothing answers changes nothing.

use anyhow::Result;
use chrono::Utc;
use reqwest::Client;

use crate::inventory::builder::build_hub;
use crate::models::Snapshot;
use crate::network::{canonicalize_address, validate_address};
use crate::poller::{fetch_device_tree, fetch_hub_details};
use crate::{log_stderr, log_warn};

/// Result of one batch scan.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Hub addresses successfully re-scanned, in scan order.
    pub scanned: Vec<String>,
    /// Candidate addresses that failed validation or fetch.
    pub failed: Vec<String>,
    /// True once the batch wipe ran (at least one address was reachable).
    pub wiped: bool,
}

impl ScanOutcome {
    /// True when the batch changed nothing and the prior snapshot stands.
    pub fn nothing_changed(&self) -> bool {
        !self.wiped
    }
}

/// Remove every batch hub's records from the snapshot.
///
/// All hubs named in the batch are wiped, including ones that later fail to
/// answer; hubs outside the batch keep their previous records. Candidates
/// that do not even canonicalize are ignored here (they never owned records
/// under a canonical key).
pub fn wipe_batch(snapshot: &mut Snapshot, candidates: &[String]) {
    for candidate in candidates {
        if let Some(address) = canonicalize_address(candidate) {
            snapshot.remove_hub(&address);
        }
    }
}

/// Post-scan pass: drop dead mesh-index entries, re-sort the collections by
/// display name and stamp the snapshot.
pub fn finalize_scan(snapshot: &mut Snapshot) {
    snapshot.prune_mesh_index();
    snapshot.sort_collections();
    snapshot.last_updated = Some(Utc::now());
}

/// Run a full batch scan over `candidates`, sequentially and in list order.
///
/// The caller persists the snapshot afterwards; when
/// `outcome.nothing_changed()` the snapshot was not touched and persisting
/// may be skipped.
pub async fn run_scan(
    snapshot: &mut Snapshot,
    client: &Client,
    candidates: &[String],
) -> Result<ScanOutcome> {
    let mut outcome = ScanOutcome::default();

    for candidate in candidates {
        let address = match validate_address(candidate).await {
            Some(address) => address,
            None => {
                log_warn!("Address {} is invalid or unreachable, skipping", candidate);
                outcome.failed.push(candidate.clone());
                continue;
            }
        };

        if !outcome.wiped {
            wipe_batch(snapshot, candidates);
            outcome.wiped = true;
        }

        let details = match fetch_hub_details(client, &address).await {
            Ok(details) => details,
            Err(e) => {
                log_warn!("Hub {}: {:#}", address, e);
                outcome.failed.push(candidate.clone());
                continue;
            }
        };
        let tree = match fetch_device_tree(client, &address).await {
            Ok(tree) => tree,
            Err(e) => {
                log_warn!("Hub {}: {:#}", address, e);
                outcome.failed.push(candidate.clone());
                continue;
            }
        };

        let stats = build_hub(snapshot, &address, &details, tree);
        log_stderr!(
            "Hub {} ({}): {} devices, {} apps, {} nodes skipped",
            details.name,
            address,
            stats.devices,
            stats.apps,
            stats.skipped
        );
        outcome.scanned.push(address);
    }

    if outcome.wiped {
        finalize_scan(snapshot);
    }

    Ok(outcome)
}
