//! HTML report rendering
//!
//! Single self-contained HTML document built with a string writer; no
//! templating engine, matching the plain report-builder style of the rest of
//! the export layer.

use chrono::Utc;

use super::view::{DeviceRow, HubRow, IssueSection, MeshGroup};

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn device_cells(out: &mut String, row: &DeviceRow, depth: usize) {
    let indent = "&nbsp;&nbsp;&nbsp;&nbsp;".repeat(depth);
    let mut markers = Vec::new();
    if row.disabled {
        markers.push("disabled");
    }
    if row.mesh_linked {
        markers.push("linked");
    }
    if row.mesh_source {
        markers.push("mesh source");
    }

    out.push_str("<tr>");
    out.push_str(&format!(
        "<td>{}<a href=\"{}\">{}</a></td>",
        indent,
        escape(&row.url),
        escape(&row.name)
    ));
    out.push_str(&format!("<td>{}</td>", markers.join(", ")));
    out.push_str(&format!("<td>{}</td>", row.protocol.unwrap_or("")));
    out.push_str(&format!(
        "<td>{}</td>",
        row.battery.map(|b| format!("{b}%")).unwrap_or_default()
    ));
    out.push_str(&format!(
        "<td>{}</td>",
        row.last_activity
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    ));
    out.push_str(&format!("<td>{}</td>", escape(&row.in_use_by.join(", "))));
    out.push_str(&format!("<td>{}</td>", escape(&row.hub_name)));
    out.push_str("</tr>\n");

    for child in &row.children {
        device_cells(out, child, depth + 1);
    }
}

/// Render the full inventory report as one HTML document.
pub fn render_html_report(
    hubs: &[HubRow],
    devices: &[DeviceRow],
    mesh: &[MeshGroup],
    issues: &[IssueSection],
) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Hub Inventory Report</title>\n");
    out.push_str(
        "<style>body{font-family:sans-serif;margin:2em}table{border-collapse:collapse;margin-bottom:2em}\
td,th{border:1px solid #ccc;padding:4px 8px;text-align:left}th{background:#eee}\
h2{border-bottom:1px solid #ccc}</style>\n",
    );
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!(
        "<h1>Hub Inventory Report</h1>\n<p>Generated {}</p>\n",
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    ));

    out.push_str("<h2>Hubs</h2>\n<table>\n<tr><th>Name</th><th>Address</th><th>Platform</th><th>Hardware</th></tr>\n");
    for hub in hubs {
        out.push_str(&format!(
            "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&hub.url),
            escape(&hub.name),
            escape(&hub.ip),
            escape(hub.platform_version.as_deref().unwrap_or("")),
            escape(hub.hardware_version.as_deref().unwrap_or("")),
        ));
    }
    out.push_str("</table>\n");

    out.push_str("<h2>Devices</h2>\n<table>\n<tr><th>Name</th><th>Flags</th><th>Protocol</th><th>Battery</th><th>Last Activity</th><th>In Use By</th><th>Hub</th></tr>\n");
    for row in devices {
        device_cells(&mut out, row, 0);
    }
    out.push_str("</table>\n");

    out.push_str("<h2>Hub Mesh</h2>\n");
    for group in mesh {
        out.push_str(&format!(
            "<h3>{} <small>[{}]</small></h3>\n",
            escape(&group.source_label),
            escape(&group.source_id)
        ));
        if group.dangling {
            out.push_str("<p><strong>Source device no longer exists.</strong></p>\n");
        } else if !group.source_enabled {
            out.push_str("<p><strong>Mesh is disabled on the source device.</strong></p>\n");
        }
        if group.remotes.is_empty() {
            out.push_str("<p>No remote devices.</p>\n");
        } else {
            out.push_str("<table>\n<tr><th>Remote</th><th>Flags</th><th>Protocol</th><th>Battery</th><th>Last Activity</th><th>In Use By</th><th>Hub</th></tr>\n");
            for remote in &group.remotes {
                device_cells(&mut out, remote, 0);
            }
            out.push_str("</table>\n");
        }
    }

    out.push_str("<h2>Health Checks</h2>\n");
    for section in issues {
        out.push_str(&format!(
            "<h3>{} ({} found, {} suppressed)</h3>\n",
            escape(section.category.title()),
            section.devices.len(),
            section.suppressed
        ));
        if section.devices.is_empty() {
            out.push_str("<p>None.</p>\n");
            continue;
        }
        out.push_str("<ul>\n");
        for row in &section.devices {
            out.push_str(&format!(
                "<li><a href=\"{}\">{}</a> ({})</li>\n",
                escape(&row.url),
                escape(&row.name),
                escape(&row.hub_name)
            ));
        }
        out.push_str("</ul>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}
