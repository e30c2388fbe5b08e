//! hubaudit — Cross-Hub Device Inventory Auditor CLI
//!
//! Polls home-automation hubs over HTTP, reconciles their device inventory
//! into one snapshot and reports on cross-hub health.

mod app;
mod cli;
mod command_handlers;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging failure is not fatal: the CLI still works on stderr alone.
    if let Err(e) = hubaudit::logging::init_logging() {
        eprintln!("[WARN] Failed to initialize file logging: {e}");
    }

    app::run(std::env::args()).await
}
