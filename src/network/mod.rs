//! Hub address validation and scan-target list handling

mod validator;

pub use validator::{canonicalize_address, probe_hub_ports, validate_address};

/// Parse a newline-delimited hub address list.
///
/// `#` starts a comment; blank and comment-only lines are ignored. The
/// returned candidates are raw, not yet validated.
pub fn parse_hub_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            let line = match line.find('#') {
                Some(pos) => &line[..pos],
                None => line,
            };
            line.trim()
        })
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}
