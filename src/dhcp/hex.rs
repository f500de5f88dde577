//! Hex text form of option bytes and IPv4 byte helpers.

use crate::error::DhcpError;
use crate::models::parse_ipv4;
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use std::net::Ipv4Addr;

lazy_static! {
    static ref HEX_SEPARATORS: Regex = Regex::new(r"[:.\s-]").expect("Invalid Regex?");
}

/// Two lowercase hex digits per byte joined with `separator`.
pub fn bytes_to_hex(bytes: &[u8], separator: &str) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).join(separator)
}

/// Inverse of [`bytes_to_hex`] for any of the separators `:` `.` `-` or
/// whitespace, or none at all.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, DhcpError> {
    let clean = HEX_SEPARATORS.replace_all(hex, "");
    if clean.len() % 2 != 0 || !clean.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DhcpError::InvalidHex(hex.to_string()));
    }
    (0..clean.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&clean[i..i + 2], 16)
                .map_err(|_| DhcpError::InvalidHex(hex.to_string()))
        })
        .collect()
}

/// Octets of a strictly valid dotted quad.
pub fn ip_to_bytes(ip: &str) -> Option<[u8; 4]> {
    parse_ipv4(ip).ok().map(|addr| addr.octets())
}

pub fn bytes_to_ip(bytes: [u8; 4]) -> String {
    Ipv4Addr::from(bytes).to_string()
}

/// `10.0.1.1` -> `0a:00:01:01`.
pub fn ip_to_hex(ip: &str) -> Option<String> {
    ip_to_bytes(ip).map(|bytes| bytes_to_hex(&bytes, ":"))
}
