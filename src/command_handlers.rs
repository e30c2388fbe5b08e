use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;

use hubaudit::config::default_snapshot_path;
use hubaudit::inventory::run_scan;
use hubaudit::issues::classify;
use hubaudit::network::parse_hub_list;
use hubaudit::notify::notify_issues;
use hubaudit::poller::new_http_client;
use hubaudit::reports::{
    device_rows, export_devices_csv, export_issues_csv, hub_rows, issue_sections, mesh_groups,
    render_device_listing, render_html_report, render_hub_listing, render_issue_report,
    render_mesh_listing,
};
use hubaudit::store::{load_snapshot, save_snapshot};
use hubaudit::{log_error, log_stderr};

use crate::cli::ExportFormat;

fn snapshot_path(snapshot_override: Option<&str>) -> PathBuf {
    snapshot_override
        .map(PathBuf::from)
        .unwrap_or_else(default_snapshot_path)
}

pub(crate) async fn handle_scan(hubs_file: &str, snapshot_override: Option<&str>) -> Result<()> {
    let text = std::fs::read_to_string(hubs_file)
        .with_context(|| format!("Failed to read hub list {hubs_file}"))?;
    let candidates = parse_hub_list(&text);
    if candidates.is_empty() {
        anyhow::bail!("Hub list {} contains no addresses", hubs_file);
    }

    let path = snapshot_path(snapshot_override);
    let mut snapshot = load_snapshot(&path)?;
    let client = new_http_client()?;

    log_stderr!("Scanning {} candidate addresses...", candidates.len());
    let outcome = run_scan(&mut snapshot, &client, &candidates).await?;

    if outcome.nothing_changed() {
        log_error!("No address in the batch was reachable. Nothing changed.");
        anyhow::bail!("Scan failed: no reachable hub");
    }

    save_snapshot(&path, &snapshot).context(
        "Failed to persist snapshot; the previous on-disk snapshot is unchanged. Nothing changed.",
    )?;

    log_stderr!(
        "Scan complete: {} hubs rescanned, {} addresses failed, {} devices total",
        outcome.scanned.len(),
        outcome.failed.len(),
        snapshot.devices.len()
    );
    Ok(())
}

pub(crate) async fn handle_list(snapshot_override: Option<&str>) -> Result<()> {
    let snapshot = load_snapshot(&snapshot_path(snapshot_override))?;
    print!("{}", render_hub_listing(&hub_rows(&snapshot)));
    println!();
    print!("{}", render_device_listing(&device_rows(&snapshot)));
    Ok(())
}

pub(crate) async fn handle_mesh(snapshot_override: Option<&str>) -> Result<()> {
    let snapshot = load_snapshot(&snapshot_path(snapshot_override))?;
    print!("{}", render_mesh_listing(&mesh_groups(&snapshot)));
    Ok(())
}

pub(crate) async fn handle_issues(notify: bool, snapshot_override: Option<&str>) -> Result<()> {
    let snapshot = load_snapshot(&snapshot_path(snapshot_override))?;
    let report = classify(&snapshot, &snapshot.device_ids(), Utc::now());
    let sections = issue_sections(&snapshot, &report);
    print!("{}", render_issue_report(&sections));

    if notify || snapshot.config.notify_on_issue {
        let mut config = snapshot.config.clone();
        config.notify_on_issue = true;
        let client = new_http_client()?;
        let delivered = notify_issues(&client, &config, &report).await;
        log_stderr!("Webhook notifications delivered: {}", delivered);
    }
    Ok(())
}

pub(crate) async fn handle_export(
    format: ExportFormat,
    output: Option<&str>,
    snapshot_override: Option<&str>,
) -> Result<()> {
    let snapshot = load_snapshot(&snapshot_path(snapshot_override))?;

    let (rendered, default_path) = match format {
        ExportFormat::Csv => (
            export_devices_csv(&device_rows(&snapshot))?,
            snapshot.config.csv_report_path.clone(),
        ),
        ExportFormat::IssuesCsv => {
            let report = classify(&snapshot, &snapshot.device_ids(), Utc::now());
            (
                export_issues_csv(&issue_sections(&snapshot, &report))?,
                snapshot.config.csv_report_path.clone(),
            )
        }
        ExportFormat::Html => {
            let report = classify(&snapshot, &snapshot.device_ids(), Utc::now());
            (
                render_html_report(
                    &hub_rows(&snapshot),
                    &device_rows(&snapshot),
                    &mesh_groups(&snapshot),
                    &issue_sections(&snapshot, &report),
                ),
                snapshot.config.html_report_path.clone(),
            )
        }
    };

    match output.map(str::to_string).or(default_path) {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write report to {path}"))?;
            log_stderr!("Report written to {}", path);
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
