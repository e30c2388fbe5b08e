//! Batch scan merge semantics over the snapshot
//!
//! Exercises the wipe-then-rebuild flow the way the scan workflow drives it:
//! validate, wipe the batch, rebuild reachable hubs, finalize, persist.

use serde_json::json;

use hubaudit::inventory::{build_hub, finalize_scan, wipe_batch};
use hubaudit::poller::RawHubDetails;
use hubaudit::store::{load_snapshot, save_snapshot};
use hubaudit::Snapshot;

fn details(name: &str) -> RawHubDetails {
    serde_json::from_value(json!({
        "name": name,
        "platformVersion": "2.4.1.155",
        "hardwareVersion": "Rev C-8"
    }))
    .unwrap()
}

fn seed_two_hubs() -> Snapshot {
    let mut snapshot = Snapshot::default();

    // Hub A: a shared lamp (mesh source) and a battery sensor.
    build_hub(
        &mut snapshot,
        "192.168.1.10",
        &details("Hub A"),
        vec![
            json!({ "id": 1, "name": "Shared Lamp", "hubMeshEnabled": true }),
            json!({ "id": 2, "name": "Door Sensor", "zigbee": true, "battery": 88 }),
        ],
    );

    // Hub B: the remote proxy of hub A's lamp plus a local device.
    build_hub(
        &mut snapshot,
        "192.168.1.11",
        &details("Hub B"),
        vec![
            json!({ "id": 5, "name": "Shared Lamp", "source": "Linked",
                    "sourceUrl": "http://192.168.1.10/device/edit/1" }),
            json!({ "id": 6, "name": "Basement Fan" }),
        ],
    );

    finalize_scan(&mut snapshot);
    snapshot
}

#[test]
fn cross_hub_mesh_index_links_source_and_remote() {
    let snapshot = seed_two_hubs();

    assert_eq!(
        snapshot.mesh_index["192.168.1.10-1"],
        vec!["192.168.1.11-5".to_string()]
    );
    let remote = &snapshot.devices["192.168.1.11-5"];
    assert_eq!(remote.source_device_id.as_deref(), Some("192.168.1.10-1"));
    assert!(snapshot.devices["192.168.1.10-1"].mesh_source_enabled);
}

#[test]
fn rescanning_one_hub_preserves_hubs_outside_the_batch() {
    let mut snapshot = seed_two_hubs();

    // Re-scan only hub B; hub A is not in the batch.
    let batch = vec!["192.168.1.11".to_string()];
    wipe_batch(&mut snapshot, &batch);
    build_hub(
        &mut snapshot,
        "192.168.1.11",
        &details("Hub B"),
        vec![json!({ "id": 7, "name": "New Dimmer" })],
    );
    finalize_scan(&mut snapshot);

    // Hub A untouched, hub B rebuilt: old remote gone, new device present.
    assert!(snapshot.devices.contains_key("192.168.1.10-1"));
    assert!(snapshot.devices.contains_key("192.168.1.10-2"));
    assert!(!snapshot.devices.contains_key("192.168.1.11-5"));
    assert!(snapshot.devices.contains_key("192.168.1.11-7"));

    // The source kept its index entry, now with zero remotes.
    assert_eq!(snapshot.mesh_index["192.168.1.10-1"], Vec::<String>::new());
}

#[test]
fn batch_wipe_drops_unreachable_batch_members() {
    // Both hubs are in the batch but only hub A answers: hub B's previous
    // records go with the wipe. This matches the scan workflow's
    // first-reachable-address wipe policy.
    let mut snapshot = seed_two_hubs();

    let batch = vec!["192.168.1.10".to_string(), "192.168.1.11".to_string()];
    wipe_batch(&mut snapshot, &batch);
    build_hub(
        &mut snapshot,
        "192.168.1.10",
        &details("Hub A"),
        vec![json!({ "id": 1, "name": "Shared Lamp", "hubMeshEnabled": true })],
    );
    finalize_scan(&mut snapshot);

    assert!(snapshot.hubs.contains_key("192.168.1.10"));
    assert!(!snapshot.hubs.contains_key("192.168.1.11"));
    assert!(!snapshot.devices.contains_key("192.168.1.11-6"));
}

#[test]
fn orphaned_remotes_survive_source_hub_rescan() {
    let mut snapshot = seed_two_hubs();

    // Hub A is re-scanned and the shared lamp is gone from it.
    let batch = vec!["192.168.1.10".to_string()];
    wipe_batch(&mut snapshot, &batch);
    build_hub(
        &mut snapshot,
        "192.168.1.10",
        &details("Hub A"),
        vec![json!({ "id": 2, "name": "Door Sensor", "zigbee": true, "battery": 88 })],
    );
    finalize_scan(&mut snapshot);

    // Hub B's remote still references the now-dangling source; the index
    // entry must survive for orphan detection.
    assert_eq!(
        snapshot.mesh_index["192.168.1.10-1"],
        vec!["192.168.1.11-5".to_string()]
    );
    assert!(!snapshot.devices.contains_key("192.168.1.10-1"));
}

#[test]
fn snapshot_round_trip_reproduces_collections_after_sort() {
    let snapshot = seed_two_hubs();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    save_snapshot(&path, &snapshot).unwrap();
    let reloaded = load_snapshot(&path).unwrap();

    assert_eq!(reloaded.hubs.len(), snapshot.hubs.len());
    assert_eq!(reloaded.devices.len(), snapshot.devices.len());
    assert_eq!(reloaded.apps.len(), snapshot.apps.len());
    assert_eq!(reloaded.mesh_index, snapshot.mesh_index);

    let names_before: Vec<&str> = snapshot.iter_devices().map(|d| d.name.as_str()).collect();
    let names_after: Vec<&str> = reloaded.iter_devices().map(|d| d.name.as_str()).collect();
    assert_eq!(names_before, names_after);
}
