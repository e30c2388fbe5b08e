//! Stderr logging macros shared across the crate
//!
//! Short human-readable lines for the interactive flows; the tracing layers
//! capture the structured counterparts.

/// Logs an informational message to stderr
#[macro_export]
macro_rules! log_stderr {
    ($($arg:tt)*) => {
        eprintln!("[INFO] {}", format!($($arg)*));
    };
}

/// Logs a warning to stderr
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        eprintln!("[WARN] {}", format!($($arg)*));
    };
}

/// Logs an error message to stderr
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        eprintln!("[ERROR] {}", format!($($arg)*));
    };
}
