//! Shared networking constants and helpers used by client and server.

/// TCP port the push channel listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 3000;

/// Helper to format an IPv4 address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}
