//! Report rendering
//!
//! The view layer turns the snapshot into fully-resolved display records;
//! the terminal/HTML/CSV renderers only format those records and perform no
//! relationship resolution of their own.

pub mod csv;
pub mod html;
pub mod terminal;
pub mod view;

pub use csv::{export_devices_csv, export_issues_csv};
pub use html::render_html_report;
pub use terminal::{
    render_device_listing, render_hub_listing, render_issue_report, render_mesh_listing,
};
pub use view::{device_rows, hub_rows, issue_sections, mesh_groups, DeviceRow, HubRow, IssueSection, MeshGroup};
