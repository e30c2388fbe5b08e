//! Terminal rendering
//!
//! Plain-text renderers over the display views. Pure string builders so the
//! output is testable; the command handlers print the result.

use super::view::{DeviceRow, HubRow, IssueSection, MeshGroup};

fn device_line(row: &DeviceRow) -> String {
    let mut line = row.name.clone();
    if row.disabled {
        line.push_str(" [disabled]");
    }
    if row.mesh_linked {
        line.push_str(" [linked]");
    }
    if row.mesh_source {
        line.push_str(" [mesh source]");
    }

    let mut details = Vec::new();
    if let Some(protocol) = row.protocol {
        details.push(protocol.to_string());
    }
    if let Some(battery) = row.battery {
        details.push(format!("battery {battery}%"));
    }
    if let Some(last_activity) = row.last_activity {
        details.push(format!("last active {}", last_activity.format("%Y-%m-%d %H:%M")));
    }
    if !row.in_use_by.is_empty() {
        details.push(format!("in use by: {}", row.in_use_by.join(", ")));
    }
    if !details.is_empty() {
        line.push_str(&format!(" ({})", details.join(", ")));
    }

    line.push_str(&format!("  @ {}", row.hub_name));
    line
}

fn push_device(out: &mut String, row: &DeviceRow, indent: usize) {
    out.push_str(&"    ".repeat(indent));
    out.push_str(&device_line(row));
    out.push('\n');
    for child in &row.children {
        push_device(out, child, indent + 1);
    }
}

/// Render the hub listing.
pub fn render_hub_listing(hubs: &[HubRow]) -> String {
    let mut out = format!("Hubs ({}):\n", hubs.len());
    for hub in hubs {
        out.push_str(&format!("  {} ({})", hub.name, hub.ip));
        if let Some(platform) = &hub.platform_version {
            out.push_str(&format!("  platform {platform}"));
        }
        if let Some(hardware) = &hub.hardware_version {
            out.push_str(&format!("  hardware {hardware}"));
        }
        out.push('\n');
    }
    out
}

/// Render the parent/child device listing, children indented under parents.
pub fn render_device_listing(rows: &[DeviceRow]) -> String {
    let mut out = format!("Devices ({} top-level):\n", rows.len());
    for row in rows {
        push_device(&mut out, row, 1);
    }
    out
}

/// Render the mesh source/remote listing.
pub fn render_mesh_listing(groups: &[MeshGroup]) -> String {
    let mut out = format!("Hub mesh sources ({}):\n", groups.len());
    for group in groups {
        out.push_str(&format!("  {} [{}]", group.source_label, group.source_id));
        if group.dangling {
            out.push_str("  ** source device no longer exists **");
        } else if !group.source_enabled {
            out.push_str("  ** mesh disabled on source **");
        }
        out.push('\n');
        if group.remotes.is_empty() {
            out.push_str("    (no remote devices)\n");
        }
        for remote in &group.remotes {
            push_device(&mut out, remote, 2);
        }
    }
    out
}

/// Render the issue report, all categories in fixed order with suppressed
/// counts always shown.
pub fn render_issue_report(sections: &[IssueSection]) -> String {
    let mut out = String::from("Device health report\n");
    for section in sections {
        out.push_str(&format!(
            "\n{} ({} found, {} suppressed)\n",
            section.category.title(),
            section.devices.len(),
            section.suppressed
        ));
        if section.devices.is_empty() {
            out.push_str("  none\n");
        }
        for row in &section.devices {
            out.push_str(&format!("  {}\n    {}\n", device_line(row), row.url));
        }
    }
    out
}
