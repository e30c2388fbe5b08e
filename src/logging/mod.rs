//! Structured logging for the hub inventory auditor
//!
//! Provides file-based logging with rotation and structured log output.
//! Logs are written under the platform config directory.

pub mod macros;

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system
///
/// Creates the log directory and sets up daily rotating log files.
/// Logs are written to: `<config dir>/hubaudit/logs/hubaudit.log.YYYY-MM-DD`
///
/// Set `RUST_LOG` to control the log level (`RUST_LOG=debug`, `RUST_LOG=trace`).
pub fn init_logging() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "hubaudit.log");

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .json();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let init_result = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = init_result {
        // Avoid panicking when another subsystem/test already installed a global subscriber.
        if e.to_string().contains("already been set") {
            return Ok(log_dir);
        }
        return Err(Box::new(e));
    }

    tracing::info!("Logging initialized. Log directory: {}", log_dir.display());

    Ok(log_dir)
}

/// Get log directory path
///
/// Returns: `%APPDATA%/hubaudit/logs` on Windows
///          `~/.config/hubaudit/logs` on Linux/macOS
fn get_log_directory() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .ok_or("Could not find APPDATA directory")?
            .join("hubaudit")
    } else {
        dirs::config_dir()
            .ok_or("Could not find config directory")?
            .join("hubaudit")
    };

    Ok(base_dir.join("logs"))
}

/// Get current log file path (for diagnostics display)
pub fn get_current_log_file() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let log_dir = get_log_directory()?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    Ok(log_dir.join(format!("hubaudit.log.{}", today)))
}
