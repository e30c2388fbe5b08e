//! Hub HTTP poller
//!
//! Fetches the hub-details and device-tree payloads from each hub's local
//! API. The inventory builder consumes the raw payloads; all transport
//! concerns (timeouts, fetch failures) stop here.

mod payload;

pub use payload::{RawApp, RawDevice, RawHubDetails};

use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::HUB_FETCH_TIMEOUT;

/// Build the HTTP client used for hub polling.
pub fn new_http_client() -> Result<Client> {
    Client::builder()
        .timeout(HUB_FETCH_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch hub identity details (name, platform/hardware versions).
pub async fn fetch_hub_details(client: &Client, hub_ip: &str) -> Result<RawHubDetails> {
    let url = format!("http://{hub_ip}/hub/api/details");
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch hub details from {hub_ip}"))?
        .error_for_status()
        .with_context(|| format!("Hub {hub_ip} rejected the details request"))?;

    response
        .json::<RawHubDetails>()
        .await
        .with_context(|| format!("Malformed hub details payload from {hub_ip}"))
}

/// Fetch the full device tree as raw JSON nodes.
///
/// Nodes are returned unparsed so the builder can skip a single malformed
/// device record with a warning instead of failing the whole hub.
pub async fn fetch_device_tree(client: &Client, hub_ip: &str) -> Result<Vec<serde_json::Value>> {
    let url = format!("http://{hub_ip}/hub/api/devices");
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch device tree from {hub_ip}"))?
        .error_for_status()
        .with_context(|| format!("Hub {hub_ip} rejected the device tree request"))?;

    response
        .json::<Vec<serde_json::Value>>()
        .await
        .with_context(|| format!("Malformed device tree payload from {hub_ip}"))
}
