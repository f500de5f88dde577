//! Option 121, classless static routes (RFC 3442).
//!
//! Each route is `[prefix_len, significant destination octets, gateway x4]`
//! with `ceil(prefix_len / 8)` destination octets. Routes are concatenated
//! without a separator, the prefix length of each one tells where it ends.

use super::hex::{bytes_to_ip, ip_to_bytes};
use crate::error::DhcpError;
use crate::models::{get_cidr_mask, MAX_LENGTH};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A static route as entered or decoded.
///
/// `destination` may also carry its own length (`10.0.0.0/8`), which then
/// takes precedence over `prefix`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub destination: String,
    #[serde(default)]
    pub prefix: u8,
    pub gateway: String,
}

impl Route {
    pub fn new(destination: &str, prefix: u8, gateway: &str) -> Route {
        Route {
            destination: destination.to_string(),
            prefix,
            gateway: gateway.to_string(),
        }
    }

    /// Destination address and prefix with any `/len` suffix applied.
    pub fn target(&self) -> Option<(&str, u8)> {
        match self.destination.split_once('/') {
            Some((dest, len)) => len.trim().parse().ok().map(|len| (dest.trim(), len)),
            None => Some((self.destination.trim(), self.prefix)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target() {
            Some((dest, prefix)) => write!(f, "{dest}/{prefix} via {}", self.gateway),
            None => write!(f, "{} via {}", self.destination, self.gateway),
        }
    }
}

/// Parses `dest/len,gateway`.
impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, gateway) = s
            .split_once(',')
            .ok_or_else(|| format!("Expected destination/len,gateway: {s}"))?;
        let route = Route::new(target.trim(), 0, gateway.trim());
        match route.target() {
            Some(_) if target.contains('/') => Ok(route),
            _ => Err(format!("Expected destination/len,gateway: {s}")),
        }
    }
}

/// Wire form of one route, empty when any part is invalid.
pub fn encode_route_121(destination: &str, prefix: u8, gateway: &str) -> Vec<u8> {
    let (Some(dest), Some(gw), Ok(mask)) = (
        ip_to_bytes(destination),
        ip_to_bytes(gateway),
        get_cidr_mask(prefix),
    ) else {
        return vec![];
    };
    let dest = (u32::from_be_bytes(dest) & mask).to_be_bytes();
    let significant = usize::from(prefix).div_ceil(8);

    let mut bytes = Vec::with_capacity(1 + significant + 4);
    bytes.push(prefix);
    bytes.extend_from_slice(&dest[..significant]);
    bytes.extend_from_slice(&gw);
    bytes
}

/// Concatenated wire form of all valid routes. Invalid routes are skipped so
/// the rest of the list still encodes.
pub fn encode_option_121(routes: &[Route]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for route in routes {
        let encoded = route
            .target()
            .map(|(dest, prefix)| encode_route_121(dest, prefix, &route.gateway))
            .unwrap_or_default();
        if encoded.is_empty() {
            log::warn!("Skipping invalid Option 121 route: {route}");
            continue;
        }
        bytes.extend(encoded);
    }
    bytes
}

/// Inverse of [`encode_option_121`].
pub fn decode_option_121(bytes: &[u8]) -> Result<Vec<Route>, DhcpError> {
    let mut routes = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let offset = i;
        let prefix = bytes[i];
        if prefix > MAX_LENGTH {
            return Err(DhcpError::PrefixTooLong { prefix, offset });
        }
        let significant = usize::from(prefix).div_ceil(8);
        let start = i + 1;
        let route = bytes
            .get(start..start + significant + 4)
            .ok_or(DhcpError::TruncatedRoute { offset })?;

        let mut dest = [0u8; 4];
        dest[..significant].copy_from_slice(&route[..significant]);
        let mut gateway = [0u8; 4];
        gateway.copy_from_slice(&route[significant..]);

        routes.push(Route::new(&bytes_to_ip(dest), prefix, &bytes_to_ip(gateway)));
        i = start + significant + 4;
    }
    Ok(routes)
}
