//! Caller-origin resolution for rate limiting
//!
//! Rate-limit counters are keyed by (phone, origin). The origin should come
//! from the least spoofable source available: the socket peer address first,
//! proxy headers only as a fallback. Resolution is total; when nothing
//! usable is present the shared sentinel `0.0.0.0` keeps abuse from a
//! header-less client bounded by a single bucket.

use std::net::IpAddr;

/// Sentinel origin used when no valid client address can be determined
pub const UNKNOWN_ORIGIN: &str = "0.0.0.0";

/// Resolve the best-effort network origin of a caller
///
/// * `peer_addr` - the transport-level peer IP (not spoofable), preferred
/// * `forwarded_for` - `X-Forwarded-For` header value; only the first entry
///   is considered
/// * `client_ip` - `Client-IP` header value, last resort
pub fn resolve_origin(
    peer_addr: Option<&str>,
    forwarded_for: Option<&str>,
    client_ip: Option<&str>,
) -> String {
    if let Some(ip) = peer_addr.and_then(parse_ip) {
        return ip.to_string();
    }

    // Proxy headers can be spoofed; used only when the peer address is absent
    if let Some(ip) = forwarded_for
        .and_then(|header| header.split(',').next())
        .and_then(parse_ip)
    {
        return ip.to_string();
    }

    if let Some(ip) = client_ip.and_then(parse_ip) {
        return ip.to_string();
    }

    UNKNOWN_ORIGIN.to_string()
}

fn parse_ip(value: &str) -> Option<IpAddr> {
    value.trim().parse().ok()
}
