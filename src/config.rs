//! Configuration for the hub inventory auditor
//!
//! `AppConfig` is persisted as part of the snapshot document; the constants
//! below are fixed operational parameters.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::issues::IssueCategory;

/// Well-known hub control ports probed during address validation.
/// Both must accept a TCP connection for an address to count as a live hub.
pub const HUB_CONTROL_PORTS: &[u16] = &[80, 8081];

/// Per-port timeout for the liveness probe
pub const LIVENESS_PROBE_TIMEOUT: Duration = Duration::from_millis(750);

/// Timeout for each hub HTTP fetch (details or device tree)
pub const HUB_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for an outbound webhook call
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// `source` marker on a device record that identifies a hub-mesh remote proxy.
/// Case-sensitive match against the platform's literal.
pub const HUB_MESH_SOURCE_MARKER: &str = "Linked";

/// Default low-battery threshold (percent)
pub const DEFAULT_LOW_BATTERY_THRESHOLD: i64 = 20;

/// Default inactivity threshold (minutes)
pub const DEFAULT_INACTIVITY_THRESHOLD_MINUTES: i64 = 1440;

/// An outbound webhook target. A disabled target is never invoked even when
/// its URL is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookTarget {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub url: Option<String>,
}

impl WebhookTarget {
    /// URL to invoke, if this target is usable.
    pub fn effective_url(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}

/// Persisted configuration: thresholds, exclusions, output toggles and
/// webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_low_battery_threshold")]
    pub low_battery_threshold: i64,
    #[serde(default = "default_inactivity_threshold_minutes")]
    pub inactivity_threshold_minutes: i64,
    /// Scheme prefixed onto hub-relative URLs in display records.
    #[serde(default = "default_url_scheme")]
    pub url_scheme: String,
    /// Per-category device exclusions. Exemption is per-category, never global.
    #[serde(default)]
    pub exclusions: BTreeMap<IssueCategory, BTreeSet<String>>,
    /// Global toggle for webhook notification after classification.
    #[serde(default)]
    pub notify_on_issue: bool,
    /// Category-specific webhook targets; fall back to `global_webhook`.
    #[serde(default)]
    pub webhooks: BTreeMap<IssueCategory, WebhookTarget>,
    #[serde(default)]
    pub global_webhook: WebhookTarget,
    /// Default output paths for rendered reports.
    #[serde(default)]
    pub html_report_path: Option<String>,
    #[serde(default)]
    pub csv_report_path: Option<String>,
}

fn default_low_battery_threshold() -> i64 {
    DEFAULT_LOW_BATTERY_THRESHOLD
}

fn default_inactivity_threshold_minutes() -> i64 {
    DEFAULT_INACTIVITY_THRESHOLD_MINUTES
}

fn default_url_scheme() -> String {
    "http".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            low_battery_threshold: default_low_battery_threshold(),
            inactivity_threshold_minutes: default_inactivity_threshold_minutes(),
            url_scheme: default_url_scheme(),
            exclusions: BTreeMap::new(),
            notify_on_issue: false,
            webhooks: BTreeMap::new(),
            global_webhook: WebhookTarget::default(),
            html_report_path: None,
            csv_report_path: None,
        }
    }
}

impl AppConfig {
    /// True when `device_id` is exempted from `category`.
    pub fn is_excluded(&self, category: IssueCategory, device_id: &str) -> bool {
        self.exclusions
            .get(&category)
            .is_some_and(|ids| ids.contains(device_id))
    }

    /// Webhook URL for a category: category-specific target if usable,
    /// else the global fallback, else none.
    pub fn webhook_url_for(&self, category: IssueCategory) -> Option<&str> {
        self.webhooks
            .get(&category)
            .and_then(WebhookTarget::effective_url)
            .or_else(|| self.global_webhook.effective_url())
    }
}

/// Default snapshot document path
///
/// Returns: `%APPDATA%/hubaudit/snapshot.json` on Windows
///          `~/.config/hubaudit/snapshot.json` on Linux/macOS
pub fn default_snapshot_path() -> PathBuf {
    let base_dir = if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        dirs::config_dir()
    };

    base_dir
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hubaudit")
        .join("snapshot.json")
}
