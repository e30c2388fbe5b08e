//! Outbound webhook notification
//!
//! Fires one best-effort POST per triggered category. Delivery failures are
//! logged with the category and URL and never block the remaining categories.

use reqwest::Client;
use serde_json::json;

use crate::config::{AppConfig, WEBHOOK_TIMEOUT};
use crate::issues::{IssueCategory, IssueReport};
use crate::log_warn;

/// Notify configured webhooks about the triggered categories.
///
/// Returns the number of webhook calls that succeeded. Nothing is sent when
/// the global toggle is off, for categories with only suppressed devices, or
/// for categories with no usable URL.
pub async fn notify_issues(client: &Client, config: &AppConfig, report: &IssueReport) -> usize {
    if !config.notify_on_issue {
        return 0;
    }

    let mut delivered = 0;
    for category in IssueCategory::ALL {
        let devices = report.devices_for(category);
        if devices.is_empty() {
            continue;
        }

        let Some(url) = config.webhook_url_for(category) else {
            tracing::debug!("No webhook configured for {}", category.as_str());
            continue;
        };

        let body = json!({
            "category": category.as_str(),
            "title": category.title(),
            "count": devices.len(),
            "devices": devices,
        });

        let result = client
            .post(url)
            .timeout(WEBHOOK_TIMEOUT)
            .json(&body)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match result {
            Ok(_) => {
                delivered += 1;
                tracing::info!(
                    "Notified {} ({} devices) via {}",
                    category.as_str(),
                    devices.len(),
                    url
                );
            }
            Err(e) => {
                log_warn!("Webhook for {} at {} failed: {}", category.as_str(), url, e);
            }
        }
    }

    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Snapshot;

    #[tokio::test]
    async fn notify_is_a_noop_when_toggle_off() {
        let snapshot = Snapshot::default();
        let report = crate::issues::classify(&snapshot, &[], chrono::Utc::now());
        let client = Client::new();

        let config = AppConfig::default();
        assert_eq!(notify_issues(&client, &config, &report).await, 0);
    }

    #[tokio::test]
    async fn notify_skips_categories_without_urls() {
        // Toggle on, but no webhook targets configured anywhere: every
        // category resolves to no URL and nothing is attempted.
        let mut snapshot = Snapshot::default();
        snapshot.config.notify_on_issue = true;
        let report = crate::issues::classify(&snapshot, &[], chrono::Utc::now());
        let client = Client::new();

        assert_eq!(notify_issues(&client, &snapshot.config, &report).await, 0);
    }
}
