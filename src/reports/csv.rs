//! CSV export
//!
//! Flat CSV renderings of the device inventory and the issue report.

use anyhow::Result;
use csv::Writer;

use super::view::{DeviceRow, IssueSection};

fn write_device_record(
    writer: &mut Writer<Vec<u8>>,
    row: &DeviceRow,
    parent: Option<&str>,
) -> Result<()> {
    let battery = row
        .battery
        .map(|b| b.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let last_activity = row
        .last_activity
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "N/A".to_string());
    let in_use_by = row.in_use_by.join("; ");

    writer.write_record([
        row.name.as_str(),
        row.id.as_str(),
        row.hub_name.as_str(),
        row.protocol.unwrap_or("LAN/Virtual"),
        battery.as_str(),
        last_activity.as_str(),
        if row.disabled { "Disabled" } else { "Enabled" },
        if row.mesh_linked { "Remote" } else if row.mesh_source { "Source" } else { "" },
        parent.unwrap_or(""),
        in_use_by.as_str(),
        row.url.as_str(),
    ])?;

    for child in &row.children {
        write_device_record(writer, child, Some(&row.name))?;
    }
    Ok(())
}

/// Export the device listing to CSV, children flattened with a parent column.
pub fn export_devices_csv(rows: &[DeviceRow]) -> Result<String> {
    let mut writer = Writer::from_writer(vec![]);

    writer.write_record([
        "Name",
        "Device ID",
        "Hub",
        "Protocol",
        "Battery %",
        "Last Activity",
        "Status",
        "Mesh Role",
        "Parent Device",
        "In Use By",
        "URL",
    ])?;

    for row in rows {
        write_device_record(&mut writer, row, None)?;
    }

    let csv_data = String::from_utf8(writer.into_inner()?)?;
    Ok(csv_data)
}

/// Export the issue report to CSV, one row per (category, device), plus a
/// suppressed-count row per category so suppression stays visible.
pub fn export_issues_csv(sections: &[IssueSection]) -> Result<String> {
    let mut writer = Writer::from_writer(vec![]);

    writer.write_record(["Category", "Device", "Device ID", "Hub", "URL", "Suppressed"])?;

    for section in sections {
        for row in &section.devices {
            writer.write_record([
                section.category.as_str(),
                row.name.as_str(),
                row.id.as_str(),
                row.hub_name.as_str(),
                row.url.as_str(),
                "",
            ])?;
        }
        let suppressed = section.suppressed.to_string();
        writer.write_record([
            section.category.as_str(),
            "",
            "",
            "",
            "",
            suppressed.as_str(),
        ])?;
    }

    let csv_data = String::from_utf8(writer.into_inner()?)?;
    Ok(csv_data)
}
