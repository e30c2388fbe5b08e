//! Hub address validation
//!
//! A candidate address is trusted as a scan target only after it both parses
//! as a dotted-decimal IPv4 string and accepts TCP connections on the two
//! well-known hub control ports.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::{HUB_CONTROL_PORTS, LIVENESS_PROBE_TIMEOUT};

/// Canonicalize a dotted-decimal IPv4 candidate.
///
/// Requires exactly 4 dot-separated segments, each all-digits and in [0,255].
/// Leading/trailing whitespace is trimmed; the output is re-joined from the
/// parsed integers, so `192.168.001.010` canonicalizes to `192.168.1.10`.
pub fn canonicalize_address(candidate: &str) -> Option<String> {
    let segments: Vec<&str> = candidate.trim().split('.').collect();
    if segments.len() != 4 {
        return None;
    }

    let mut octets = [0u8; 4];
    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Parse as u32 first so 256..999 are rejected rather than wrapped.
        let value: u32 = segment.parse().ok()?;
        if value > 255 {
            return None;
        }
        octets[i] = value as u8;
    }

    Some(Ipv4Addr::from(octets).to_string())
}

/// Probe the hub control ports on `address`.
///
/// Both ports must accept a TCP connection within the fixed per-port timeout;
/// a single refused or timed-out port rejects the address.
pub async fn probe_hub_ports(address: &str) -> bool {
    probe_ports(address, HUB_CONTROL_PORTS).await
}

/// Probe an explicit port set on `address`. Every port must accept.
async fn probe_ports(address: &str, ports: &[u16]) -> bool {
    let ip: Ipv4Addr = match address.parse() {
        Ok(ip) => ip,
        Err(_) => return false,
    };

    for &port in ports {
        let socket = SocketAddr::new(IpAddr::V4(ip), port);
        match timeout(LIVENESS_PROBE_TIMEOUT, TcpStream::connect(socket)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::debug!("Port {} on {} refused: {}", port, address, e);
                return false;
            }
            Err(_) => {
                tracing::debug!("Port {} on {} timed out", port, address);
                return false;
            }
        }
    }

    true
}

/// Validate one candidate address: canonicalize, then require liveness on
/// both hub control ports. Returns the canonical address or `None`; callers
/// report their own per-address diagnostics.
pub async fn validate_address(candidate: &str) -> Option<String> {
    let canonical = canonicalize_address(candidate)?;
    if probe_hub_ports(&canonical).await {
        Some(canonical)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_zero_padded_segments() {
        assert_eq!(
            canonicalize_address("192.168.001.010").as_deref(),
            Some("192.168.1.10")
        );
        assert_eq!(
            canonicalize_address("  10.0.0.1 ").as_deref(),
            Some("10.0.0.1")
        );
    }

    #[test]
    fn rejects_wrong_segment_count() {
        assert_eq!(canonicalize_address("192.168.1"), None);
        assert_eq!(canonicalize_address("192.168.1.1.1"), None);
        assert_eq!(canonicalize_address(""), None);
        assert_eq!(canonicalize_address("..."), None);
    }

    #[test]
    fn rejects_out_of_range_segments() {
        assert_eq!(canonicalize_address("192.168.1.256"), None);
        assert_eq!(canonicalize_address("300.1.1.1"), None);
        assert_eq!(canonicalize_address("192.168.1.999"), None);
        assert_eq!(canonicalize_address("0.0.0.255").as_deref(), Some("0.0.0.255"));
    }

    #[test]
    fn rejects_extraneous_characters() {
        assert_eq!(canonicalize_address("192.168.1.a"), None);
        assert_eq!(canonicalize_address("192.168.1.-1"), None);
        assert_eq!(canonicalize_address("192.168.1.+1"), None);
        assert_eq!(canonicalize_address("192.168. 1.1"), None);
        assert_eq!(canonicalize_address("192.168.1.1 extra"), None);
    }

    use std::net::TcpListener;

    // The well-known port pair cannot be bound in tests, so the probe is
    // exercised against ephemeral loopback listeners.
    fn ephemeral_port() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[tokio::test]
    async fn probe_accepts_when_every_port_listens() {
        let (_a, port_a) = ephemeral_port();
        let (_b, port_b) = ephemeral_port();

        assert!(probe_ports("127.0.0.1", &[port_a, port_b]).await);
    }

    #[tokio::test]
    async fn probe_rejects_when_any_port_is_closed() {
        let (open, open_port) = ephemeral_port();
        let (closed, closed_port) = ephemeral_port();
        drop(closed);

        assert!(!probe_ports("127.0.0.1", &[open_port, closed_port]).await);
        drop(open);
    }

    #[tokio::test]
    async fn probe_rejects_unparseable_address() {
        let (_l, port) = ephemeral_port();
        assert!(!probe_ports("not-an-ip", &[port]).await);
    }
}
