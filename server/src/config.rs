//! Configuration for the bakehouse HTTP server
//!
//! The listen address is resolved with the following precedence:
//! 1. BAKEHOUSE_LISTEN_ADDR environment variable
//! 2. 127.0.0.1:3000 (development default)

use std::net::SocketAddr;

const LISTEN_ADDR_VAR: &str = "BAKEHOUSE_LISTEN_ADDR";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Get the address the API server binds to.
///
/// Priority:
/// 1. BAKEHOUSE_LISTEN_ADDR env variable if set and non-blank
/// 2. 127.0.0.1:3000 as fallback
pub fn get_listen_addr() -> anyhow::Result<SocketAddr> {
    let raw = std::env::var(LISTEN_ADDR_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty());
    parse_listen_addr(raw.as_deref())
}

fn parse_listen_addr(raw: Option<&str>) -> anyhow::Result<SocketAddr> {
    let addr = raw.unwrap_or(DEFAULT_LISTEN_ADDR).trim();
    addr.parse()
        .map_err(|e| anyhow::anyhow!("invalid {} {:?}: {}", LISTEN_ADDR_VAR, addr, e))
}
