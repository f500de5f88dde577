//! IPv4 address and CIDR notation utilities.
//!
//! Provides the [`Ipv4`] block type plus the free functions the calculator
//! works with. Validation happens once when a string is parsed; the derive
//! functions below take an already valid prefix (`0..=32`) and do not check
//! it again.

use crate::error::{CidrError, SplitError};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Mask with the high `prefix` bits set. Prefix 0 yields 0 rather than
/// shifting by the full width.
fn mask_bits(prefix: u8) -> u32 {
    debug_assert!(prefix <= MAX_LENGTH, "prefix /{prefix} out of range");
    u32::MAX
        .checked_shl(u32::from(MAX_LENGTH.saturating_sub(prefix)))
        .unwrap_or(0)
}

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use subnet_zero::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, CidrError> {
    if len > MAX_LENGTH {
        Err(CidrError::PrefixOutOfRange {
            prefix: len.to_string(),
            max: MAX_LENGTH,
        })
    } else {
        Ok(mask_bits(len))
    }
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, CidrError> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv4Addr::from(u32::from(addr) & mask))
}

/// Calculate the broadcast address for a given IP and prefix length.
pub fn broadcast_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, CidrError> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv4Addr::from((u32::from(addr) & mask) | !mask))
}

/// Returns the IP address following the given subnet.
pub fn ip_after_subnet(addr: Ipv4Addr, cidr: u8) -> Result<Ipv4Addr, SplitError> {
    let mask = get_cidr_mask(cidr)?;
    let subnet_size = 1u64 << (MAX_LENGTH - cidr);
    let next = u64::from(u32::from(addr) & mask) + subnet_size;
    u32::try_from(next)
        .map(Ipv4Addr::from)
        .map_err(|_| SplitError::Overflow)
}

/// Calculate the next subnet after the given [`Ipv4`] subnet.
///
/// If `mask` is provided, the next subnet will use that mask size.
pub fn next_subnet_ipv4(ipv4: Ipv4, mask: Option<u8>) -> Result<Ipv4, SplitError> {
    let current_mask = ipv4.mask;
    let new_mask = mask.unwrap_or(current_mask);
    let addr = if new_mask <= current_mask {
        // eq or larger subnet (smaller mask)
        ip_after_subnet(ipv4.addr, new_mask)?
    } else {
        let current_broadcast = broadcast_addr(ipv4.addr, current_mask)?;
        ip_after_subnet(current_broadcast, new_mask)?
    };
    Ok(Ipv4 {
        addr,
        mask: new_mask,
    })
}

/// Calculate the minimum mask for an IP address based on trailing zeros.
pub fn lo_mask(ip: Ipv4Addr) -> u8 {
    let trailing_zeros = u32::from(ip).trailing_zeros() as u8;
    MAX_LENGTH - trailing_zeros.min(MAX_LENGTH)
}

/// Parse a dotted quad, rejecting leading-zero aliases such as `01`.
///
/// A wrong number of parts is `InvalidAddress`. Any part that is not a
/// canonical decimal 0-255 (empty, signed, non-numeric, too big, leading
/// zero) is `OctetOutOfRange`.
pub fn parse_ipv4(ip: &str) -> Result<Ipv4Addr, CidrError> {
    let parts: Vec<&str> = ip.split('.').collect();
    if parts.len() != 4 {
        return Err(CidrError::InvalidAddress(ip.to_string()));
    }
    let mut octets = [0u8; 4];
    for (octet, part) in octets.iter_mut().zip(parts) {
        let value = match part.parse::<u8>() {
            // round trip catches "01", "00" and "+1"
            Ok(value) if value.to_string() == part => value,
            _ => return Err(CidrError::OctetOutOfRange(ip.to_string())),
        };
        *octet = value;
    }
    Ok(Ipv4Addr::from(octets))
}

pub fn is_valid_ipv4(ip: &str) -> bool {
    parse_ipv4(ip).is_ok()
}

/// Parse `a.b.c.d/len` into an [`Ipv4`], keeping the host bits as typed.
pub fn validate_cidr(cidr: &str) -> Result<Ipv4, CidrError> {
    let cidr = cidr.trim();
    let (ip, prefix) = match cidr.split_once('/') {
        Some((ip, prefix)) if !prefix.is_empty() => (ip, prefix),
        _ => return Err(CidrError::MissingPrefix(cidr.to_string())),
    };
    let addr = parse_ipv4(ip)?;
    let mask = parse_prefix(prefix, MAX_LENGTH)?;
    Ok(Ipv4 { addr, mask })
}

/// Parse a decimal prefix length bounded by `max`.
pub(crate) fn parse_prefix(prefix: &str, max: u8) -> Result<u8, CidrError> {
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CidrError::InvalidPrefix(prefix.to_string()));
    }
    match prefix.parse::<u16>() {
        Ok(value) if value <= u16::from(max) => Ok(value as u8),
        _ => Err(CidrError::PrefixOutOfRange {
            prefix: prefix.to_string(),
            max,
        }),
    }
}

pub fn is_valid_cidr(cidr: &str) -> bool {
    validate_cidr(cidr).is_ok()
}

pub fn ip_to_int(ip: &str) -> Result<u32, CidrError> {
    parse_ipv4(ip).map(u32::from)
}

pub fn int_to_ip(value: u32) -> String {
    Ipv4Addr::from(value).to_string()
}

/// Dotted binary form, e.g. `00001010.00000000.00000001.00000000`.
pub fn ip_to_binary(ip: Ipv4Addr) -> String {
    ip.octets()
        .iter()
        .map(|o| format!("{o:08b}"))
        .collect::<Vec<String>>()
        .join(".")
}

pub fn prefix_to_subnet_mask(prefix: u8) -> Ipv4Addr {
    Ipv4Addr::from(mask_bits(prefix))
}

pub fn prefix_to_wildcard(prefix: u8) -> Ipv4Addr {
    Ipv4Addr::from(!mask_bits(prefix))
}

pub fn get_network_address(ip: Ipv4Addr, prefix: u8) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(ip) & mask_bits(prefix))
}

pub fn get_broadcast_address(ip: Ipv4Addr, prefix: u8) -> Ipv4Addr {
    let mask = mask_bits(prefix);
    Ipv4Addr::from((u32::from(ip) & mask) | !mask)
}

/// First host address. /31 and /32 have no network/broadcast pair
/// (RFC 3021), so the network address itself is returned.
pub fn get_first_host(ip: Ipv4Addr, prefix: u8) -> Ipv4Addr {
    let network = get_network_address(ip, prefix);
    if prefix >= 31 {
        network
    } else {
        Ipv4Addr::from(u32::from(network) + 1)
    }
}

/// Last host address, the broadcast address itself for /31 and /32.
pub fn get_last_host(ip: Ipv4Addr, prefix: u8) -> Ipv4Addr {
    let broadcast = get_broadcast_address(ip, prefix);
    if prefix >= 31 {
        broadcast
    } else {
        Ipv4Addr::from(u32::from(broadcast) - 1)
    }
}

pub fn get_total_hosts(prefix: u8) -> u64 {
    1u64 << (MAX_LENGTH - prefix.min(MAX_LENGTH))
}

/// Total minus network and broadcast; /31 and /32 keep every address.
pub fn get_usable_hosts(prefix: u8) -> u64 {
    let total = get_total_hosts(prefix);
    if prefix >= 31 {
        total
    } else {
        total - 2
    }
}

/// IPv4 address with CIDR notation support.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The subnet mask length (0-32).
    pub mask: u8,
}

impl Serialize for Ipv4 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ipv4 {
    fn deserialize<D>(deserializer: D) -> Result<Ipv4, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        validate_cidr(&s).map_err(de::Error::custom)
    }
}

impl FromStr for Ipv4 {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_cidr(s)
    }
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Ipv4, CidrError> {
        validate_cidr(addr_cidr)
    }

    /// The same block with host bits cleared.
    pub fn network(&self) -> Ipv4 {
        Ipv4 {
            addr: self.lo(),
            mask: self.mask,
        }
    }

    /// Get the broadcast address for this subnet.
    pub fn broadcast(&self) -> Ipv4 {
        Ipv4 {
            addr: self.hi(),
            mask: self.mask,
        }
    }

    /// Get the highest (broadcast) address in the subnet.
    pub fn hi(&self) -> Ipv4Addr {
        get_broadcast_address(self.addr, self.mask)
    }

    /// Get the lowest (network) address in the subnet.
    pub fn lo(&self) -> Ipv4Addr {
        get_network_address(self.addr, self.mask)
    }

    /// Inclusive `[start, end]` integer range of the block.
    pub fn range(&self) -> (u32, u32) {
        (u32::from(self.lo()), u32::from(self.hi()))
    }

    pub fn size(&self) -> u64 {
        get_total_hosts(self.mask)
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        get_network_address(ip, self.mask) == self.lo()
    }

    /// Whether `other` lies entirely inside this block.
    pub fn contains_block(&self, other: &Ipv4) -> bool {
        let (start, end) = self.range();
        let (other_start, other_end) = other.range();
        other_start >= start && other_end <= end
    }

    /// Blocks overlap iff their network addresses match at the coarser prefix.
    pub fn overlaps(&self, other: &Ipv4) -> bool {
        let prefix = self.mask.min(other.mask);
        get_network_address(self.addr, prefix) == get_network_address(other.addr, prefix)
    }
}

impl fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

/// Binary renderings shown next to a parsed block.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BinaryForms {
    pub ip: String,
    pub network: String,
    pub mask: String,
}

/// Everything derived from one IPv4 CIDR string.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CidrInfo {
    pub ip: Ipv4Addr,
    pub prefix: u8,
    pub network_address: Ipv4Addr,
    pub broadcast_address: Ipv4Addr,
    pub subnet_mask: Ipv4Addr,
    pub wildcard_mask: Ipv4Addr,
    pub total_hosts: u64,
    pub usable_hosts: u64,
    pub first_host: Ipv4Addr,
    pub last_host: Ipv4Addr,
    pub binary: BinaryForms,
}

impl CidrInfo {
    pub fn block(&self) -> Ipv4 {
        Ipv4 {
            addr: self.network_address,
            mask: self.prefix,
        }
    }
}

pub fn parse_cidr(cidr: &str) -> Result<CidrInfo, CidrError> {
    let Ipv4 { addr: ip, mask: prefix } = validate_cidr(cidr)?;
    let network_address = get_network_address(ip, prefix);
    let subnet_mask = prefix_to_subnet_mask(prefix);
    log::debug!("parse_cidr({cidr}) network={network_address}/{prefix}");
    Ok(CidrInfo {
        ip,
        prefix,
        network_address,
        broadcast_address: get_broadcast_address(ip, prefix),
        subnet_mask,
        wildcard_mask: prefix_to_wildcard(prefix),
        total_hosts: get_total_hosts(prefix),
        usable_hosts: get_usable_hosts(prefix),
        first_host: get_first_host(ip, prefix),
        last_host: get_last_host(ip, prefix),
        binary: BinaryForms {
            ip: ip_to_binary(ip),
            network: ip_to_binary(network_address),
            mask: ip_to_binary(subnet_mask),
        },
    })
}

pub fn is_ip_in_subnet(ip: &str, cidr: &str) -> bool {
    match (parse_ipv4(ip), validate_cidr(cidr)) {
        (Ok(ip), Ok(block)) => block.contains(ip),
        _ => false,
    }
}

/// Invalid input never overlaps anything.
pub fn do_subnets_overlap(cidr1: &str, cidr2: &str) -> bool {
    match (validate_cidr(cidr1), validate_cidr(cidr2)) {
        (Ok(a), Ok(b)) => a.overlaps(&b),
        _ => false,
    }
}

/// Split a block into `2^(new_prefix - prefix)` equal blocks in ascending order.
pub fn split_subnet(cidr: &str, new_prefix: u8) -> Result<Vec<Ipv4>, SplitError> {
    let block = validate_cidr(cidr)?;
    split_block(block, new_prefix)
}

pub fn split_block(block: Ipv4, new_prefix: u8) -> Result<Vec<Ipv4>, SplitError> {
    if new_prefix <= block.mask || new_prefix > MAX_LENGTH {
        return Err(SplitError::NewPrefixTooShort {
            prefix: block.mask,
            new_prefix,
            max: MAX_LENGTH,
        });
    }
    let count = 1u64 << (new_prefix - block.mask);
    let step = get_total_hosts(new_prefix);
    let start = u64::from(u32::from(block.lo()));
    Ok((0..count)
        .map(|i| Ipv4 {
            addr: Ipv4Addr::from((start + i * step) as u32),
            mask: new_prefix,
        })
        .collect())
}

/// Smallest aligned block covering every input.
///
/// Starts at the prefix implied by the covered span and widens one bit at a
/// time until the aligned block contains `[min, max]`. Empty or invalid
/// input yields `None`; a single block is returned as given.
pub fn supernet_subnets<S: AsRef<str>>(cidrs: &[S]) -> Option<Ipv4> {
    let blocks = cidrs
        .iter()
        .map(|c| validate_cidr(c.as_ref()))
        .collect::<Result<Vec<Ipv4>, CidrError>>()
        .ok()?;
    match blocks.as_slice() {
        [] => return None,
        [single] => return Some(*single),
        _ => {}
    }
    let min = blocks.iter().map(|b| b.range().0).min()?;
    let max = blocks.iter().map(|b| b.range().1).max()?;
    let span = u64::from(max - min) + 1;
    let host_bits = if span <= 1 {
        0
    } else {
        (64 - (span - 1).leading_zeros()) as u8
    };
    let required = MAX_LENGTH - host_bits;
    (0..=required).rev().find_map(|prefix| {
        let candidate = Ipv4 {
            addr: get_network_address(Ipv4Addr::from(min), prefix),
            mask: prefix,
        };
        let (start, end) = candidate.range();
        (start <= min && end >= max).then_some(candidate)
    })
}

/// One row of the prefix reference table.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetSize {
    pub prefix: u8,
    pub cidr: String,
    pub mask: Ipv4Addr,
    pub total_hosts: u64,
    pub usable_hosts: u64,
    pub description: &'static str,
}

fn subnet_description(prefix: u8) -> &'static str {
    match prefix {
        8 => "Class A",
        16 => "Class B",
        24 => "Class C",
        25 => "Half Class C",
        26 => "Quarter Class C",
        27 => "1/8 Class C",
        28 => "1/16 Class C",
        29 => "1/32 Class C (8 IPs)",
        30 => "Point-to-Point (4 IPs)",
        31 => "Point-to-Point Link",
        32 => "Single Host",
        _ => "",
    }
}

pub fn get_all_subnet_sizes() -> Vec<SubnetSize> {
    (0..=MAX_LENGTH)
        .map(|prefix| SubnetSize {
            prefix,
            cidr: format!("/{prefix}"),
            mask: prefix_to_subnet_mask(prefix),
            total_hosts: get_total_hosts(prefix),
            usable_hosts: get_usable_hosts(prefix),
            description: subnet_description(prefix),
        })
        .collect()
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IpRole {
    Network,
    Usable,
    Broadcast,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ListedIp {
    pub ip: Ipv4Addr,
    #[serde(rename = "type")]
    pub role: IpRole,
    pub index: u64,
}

/// First `limit` addresses of a block tagged by role.
pub fn list_subnet_ips(cidr: &str, limit: usize) -> Result<Vec<ListedIp>, CidrError> {
    let block = validate_cidr(cidr)?;
    let (network, broadcast) = block.range();
    let count = block.size().min(limit as u64);
    Ok((0..count)
        .map(|index| {
            let current = network + index as u32;
            let role = if current == network {
                IpRole::Network
            } else if current == broadcast {
                IpRole::Broadcast
            } else {
                IpRole::Usable
            };
            ListedIp {
                ip: Ipv4Addr::from(current),
                role,
                index,
            }
        })
        .collect())
}

/// An RFC 1918 range.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrivateRange {
    pub cidr: Ipv4,
    pub name: &'static str,
    pub start: Ipv4Addr,
    pub end: Ipv4Addr,
    pub total_hosts: u64,
}

const PRIVATE_RANGES: [(Ipv4Addr, u8, &str); 3] = [
    (Ipv4Addr::new(10, 0, 0, 0), 8, "Class A Private"),
    (Ipv4Addr::new(172, 16, 0, 0), 12, "Class B Private"),
    (Ipv4Addr::new(192, 168, 0, 0), 16, "Class C Private"),
];

pub fn get_private_ranges() -> Vec<PrivateRange> {
    PRIVATE_RANGES
        .iter()
        .map(|&(addr, mask, name)| {
            let cidr = Ipv4 { addr, mask };
            PrivateRange {
                cidr,
                name,
                start: cidr.lo(),
                end: cidr.hi(),
                total_hosts: cidr.size(),
            }
        })
        .collect()
}

pub fn is_private_ip(ip: &str) -> bool {
    match parse_ipv4(ip) {
        Ok(ip) => PRIVATE_RANGES
            .iter()
            .any(|&(addr, mask, _)| Ipv4 { addr, mask }.contains(ip)),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cidrs(blocks: &[Ipv4]) -> Vec<String> {
        blocks.iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0).unwrap(), 0x00000000);
        assert_eq!(get_cidr_mask(8).unwrap(), 0xFF000000);
        assert_eq!(get_cidr_mask(16).unwrap(), 0xFFFF0000);
        assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
        assert_eq!(get_cidr_mask(32).unwrap(), 0xFFFFFFFF);
        assert!(get_cidr_mask(33).is_err());
    }

    #[test]
    fn test_cut_addr() {
        let ip = Ipv4Addr::new(192, 168, 1, 42);
        assert_eq!(cut_addr(ip, 24).unwrap(), Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(cut_addr(ip, 16).unwrap(), Ipv4Addr::new(192, 168, 0, 0));
        assert_eq!(cut_addr(ip, 0).unwrap(), Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(cut_addr(ip, 32).unwrap(), Ipv4Addr::new(192, 168, 1, 42));
        assert!(cut_addr(ip, 33).is_err());
    }

    #[test]
    fn test_next_subnet() {
        let ip = Ipv4Addr::new(192, 168, 1, 0);
        assert_eq!(ip_after_subnet(ip, 24).unwrap(), Ipv4Addr::new(192, 168, 2, 0));
        assert_eq!(ip_after_subnet(ip, 8).unwrap(), Ipv4Addr::new(193, 0, 0, 0));
        assert_eq!(ip_after_subnet(ip, 32).unwrap(), Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(
            ip_after_subnet(Ipv4Addr::new(255, 255, 255, 255), 24),
            Err(SplitError::Overflow)
        );
    }

    #[test]
    fn test_next_subnet_ipv4() {
        let ip1 = Ipv4::new("10.1.1.0/28").unwrap();
        assert_eq!(
            next_subnet_ipv4(ip1, None).unwrap(),
            Ipv4::new("10.1.1.16/28").unwrap()
        );
        let ip5 = Ipv4::new("10.18.126.0/24").unwrap();
        let next_ip5 = next_subnet_ipv4(ip5, Some(28)).unwrap();
        assert_eq!(next_ip5, Ipv4::new("10.18.127.0/28").unwrap());
        let next_ip5 = next_subnet_ipv4(next_ip5, Some(24)).unwrap();
        assert_eq!(next_ip5, Ipv4::new("10.18.128.0/24").unwrap());
    }

    #[test]
    fn test_broadcast_addr() {
        let ip = Ipv4Addr::new(192, 168, 1, 0);
        assert_eq!(broadcast_addr(ip, 24).unwrap(), Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(broadcast_addr(ip, 8).unwrap(), Ipv4Addr::new(192, 255, 255, 255));
        assert_eq!(broadcast_addr(ip, 32).unwrap(), Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(broadcast_addr(ip, 0).unwrap(), Ipv4Addr::new(255, 255, 255, 255));
    }

    #[test]
    fn test_lo_mask() {
        assert_eq!(lo_mask(Ipv4Addr::new(192, 168, 1, 1)), 32);
        assert_eq!(lo_mask(Ipv4Addr::new(10, 6, 2, 80)), 28);
        assert_eq!(lo_mask(Ipv4Addr::new(0, 0, 0, 0)), 0);
    }

    #[test]
    fn test_is_valid_ipv4() {
        assert!(is_valid_ipv4("10.0.0.1"));
        assert!(is_valid_ipv4("255.255.255.255"));
        assert!(!is_valid_ipv4("10.0.0"));
        assert!(!is_valid_ipv4("10.0.0.01"));
        assert!(!is_valid_ipv4("10.0.0.256"));
        assert!(!is_valid_ipv4("10.0.0.-1"));
        assert!(!is_valid_ipv4("10.0.0.1a"));
        assert!(!is_valid_ipv4(""));
    }

    #[test]
    fn test_validate_cidr_reasons() {
        assert_eq!(
            validate_cidr("10.0.0.0"),
            Err(CidrError::MissingPrefix("10.0.0.0".to_string()))
        );
        assert_eq!(
            validate_cidr("10.0.0.0/"),
            Err(CidrError::MissingPrefix("10.0.0.0/".to_string()))
        );
        assert_eq!(
            validate_cidr("10.0.300.0/24"),
            Err(CidrError::OctetOutOfRange("10.0.300.0".to_string()))
        );
        assert_eq!(
            validate_cidr("10.0.0.0/33"),
            Err(CidrError::PrefixOutOfRange {
                prefix: "33".to_string(),
                max: 32
            })
        );
        assert_eq!(
            validate_cidr("10.0.0.0/2x"),
            Err(CidrError::InvalidPrefix("2x".to_string()))
        );
        for bad in ["10.0.abc.0/24", "10.0.-1.0/24", "10.0.01.0/24", "10..0.0/24"] {
            assert!(
                matches!(validate_cidr(bad), Err(CidrError::OctetOutOfRange(_))),
                "{bad} should be an octet error"
            );
        }
        assert_eq!(
            validate_cidr("10.0.0/24"),
            Err(CidrError::InvalidAddress("10.0.0".to_string()))
        );
        assert!(is_valid_cidr(" 10.0.0.0/0 "));
        assert!(!is_valid_cidr("10.0.0.0/24/1"));
    }

    #[test]
    fn test_ip_int_round_trip() {
        for ip in ["0.0.0.0", "10.0.1.0", "128.0.0.1", "255.255.255.255", "192.168.10.7"] {
            assert_eq!(int_to_ip(ip_to_int(ip).unwrap()), ip);
        }
        assert_eq!(ip_to_int("128.0.0.0").unwrap(), 0x8000_0000);
        assert_eq!(int_to_ip(0xFFFF_FFFF), "255.255.255.255");
    }

    #[test]
    fn test_masks() {
        assert_eq!(prefix_to_subnet_mask(0), Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(prefix_to_subnet_mask(20), Ipv4Addr::new(255, 255, 240, 0));
        assert_eq!(prefix_to_subnet_mask(32), Ipv4Addr::new(255, 255, 255, 255));
        assert_eq!(prefix_to_wildcard(32), Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(prefix_to_wildcard(0), Ipv4Addr::new(255, 255, 255, 255));
        assert_eq!(prefix_to_wildcard(24), Ipv4Addr::new(0, 0, 0, 255));
    }

    #[test]
    fn test_host_counts() {
        for prefix in 0..=30 {
            assert_eq!(get_total_hosts(prefix), get_usable_hosts(prefix) + 2);
        }
        assert_eq!(get_usable_hosts(31), 2);
        assert_eq!(get_usable_hosts(32), 1);
        assert_eq!(get_total_hosts(0), 4_294_967_296);
    }

    #[test]
    fn test_first_last_host_edges() {
        let ip = Ipv4Addr::new(10, 0, 0, 5);
        assert_eq!(get_first_host(ip, 24), Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(get_last_host(ip, 24), Ipv4Addr::new(10, 0, 0, 254));
        assert_eq!(get_first_host(ip, 31), Ipv4Addr::new(10, 0, 0, 4));
        assert_eq!(get_last_host(ip, 31), Ipv4Addr::new(10, 0, 0, 5));
        assert_eq!(get_first_host(ip, 32), ip);
        assert_eq!(get_last_host(ip, 32), ip);
    }

    #[test]
    fn test_parse_cidr() {
        let info = parse_cidr("10.0.1.77/24").unwrap();
        assert_eq!(info.network_address, Ipv4Addr::new(10, 0, 1, 0));
        assert_eq!(info.broadcast_address, Ipv4Addr::new(10, 0, 1, 255));
        assert_eq!(info.subnet_mask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(info.usable_hosts, 254);
        assert_eq!(info.binary.mask, "11111111.11111111.11111111.00000000");
        assert_eq!(info.block().to_string(), "10.0.1.0/24");
    }

    #[test]
    fn test_network_address_idempotent() {
        for cidr in ["10.0.1.77/24", "172.31.255.1/12", "1.2.3.4/0", "9.9.9.9/32"] {
            let info = parse_cidr(cidr).unwrap();
            assert_eq!(
                get_network_address(info.network_address, info.prefix),
                info.network_address
            );
        }
    }

    #[test]
    fn test_overlap() {
        assert!(do_subnets_overlap("10.0.0.0/24", "10.0.0.128/25"));
        assert!(!do_subnets_overlap("10.0.0.0/24", "10.0.1.0/24"));
        assert!(do_subnets_overlap("0.0.0.0/0", "192.168.1.0/24"));
        assert!(!do_subnets_overlap("10.0.0.0/24", "garbage"));
    }

    #[test]
    fn test_split_subnet() {
        let split = split_subnet("10.0.0.0/24", 26).unwrap();
        assert_eq!(
            cidrs(&split),
            vec!["10.0.0.0/26", "10.0.0.64/26", "10.0.0.128/26", "10.0.0.192/26"]
        );
        let split = split_subnet("10.0.0.77/24", 25).unwrap();
        assert_eq!(cidrs(&split), vec!["10.0.0.0/25", "10.0.0.128/25"]);
        assert_eq!(split_subnet("255.255.255.254/31", 32).unwrap().len(), 2);
        assert!(matches!(
            split_subnet("10.0.0.0/24", 24),
            Err(SplitError::NewPrefixTooShort { .. })
        ));
        assert!(split_subnet("10.0.0.0/24", 33).is_err());
        assert!(matches!(split_subnet("10.0.0.0", 25), Err(SplitError::Cidr(_))));
    }

    #[test]
    fn test_supernet() {
        let none: [&str; 0] = [];
        assert_eq!(supernet_subnets(&none), None);
        assert_eq!(
            supernet_subnets(&["10.0.0.0/24"]).unwrap().to_string(),
            "10.0.0.0/24"
        );
        assert_eq!(
            supernet_subnets(&["10.0.0.0/24", "10.0.1.0/24"]).unwrap().to_string(),
            "10.0.0.0/23"
        );
        // span fits in /23 but is not /23 aligned
        assert_eq!(
            supernet_subnets(&["10.0.1.0/24", "10.0.2.0/24"]).unwrap().to_string(),
            "10.0.0.0/22"
        );
        // needs more than one widening step
        assert_eq!(
            supernet_subnets(&["10.0.7.0/24", "10.0.8.0/24"]).unwrap().to_string(),
            "10.0.0.0/20"
        );
        assert_eq!(
            supernet_subnets(&["127.255.255.0/24", "128.0.0.0/24"])
                .unwrap()
                .to_string(),
            "0.0.0.0/0"
        );
        assert_eq!(supernet_subnets(&["10.0.0.0/24", "bad"]), None);
    }

    #[test]
    fn test_list_subnet_ips() {
        let ips = list_subnet_ips("192.168.1.0/30", 256).unwrap();
        let roles: Vec<IpRole> = ips.iter().map(|i| i.role).collect();
        assert_eq!(
            roles,
            vec![IpRole::Network, IpRole::Usable, IpRole::Usable, IpRole::Broadcast]
        );
        assert_eq!(list_subnet_ips("10.0.0.0/8", 5).unwrap().len(), 5);
    }

    #[test]
    fn test_private_ranges() {
        assert!(is_private_ip("10.1.2.3"));
        assert!(is_private_ip("172.31.0.1"));
        assert!(!is_private_ip("172.32.0.1"));
        assert!(!is_private_ip("8.8.8.8"));
        let ranges = get_private_ranges();
        assert_eq!(ranges[1].end, Ipv4Addr::new(172, 31, 255, 255));
        assert_eq!(ranges[2].total_hosts, 65536);
    }

    #[test]
    fn test_subnet_sizes_table() {
        let sizes = get_all_subnet_sizes();
        assert_eq!(sizes.len(), 33);
        assert_eq!(sizes[24].description, "Class C");
        assert_eq!(sizes[31].usable_hosts, 2);
    }

    #[test]
    fn test_ip4_cmp_overlap() {
        let ip1 = Ipv4::new("10.0.10.0/24").unwrap();
        let ip2 = Ipv4::new("10.0.0.0/8").unwrap();
        let ip3 = Ipv4::new("10.0.10.64/26").unwrap();
        assert!(ip1 > ip2);
        assert!(ip1 < ip3);
        assert!(ip2.contains_block(&ip1));
        assert!(!ip1.contains_block(&ip2));
        assert!(ip1.overlaps(&ip3));
        assert_eq!(ip2.hi(), Ipv4Addr::new(10, 255, 255, 255));
    }

    #[test]
    fn test_ipv4_serde_string() {
        let ip = Ipv4::new("10.2.0.0/16").unwrap();
        let json = serde_json::to_string(&ip).unwrap();
        assert_eq!(json, "\"10.2.0.0/16\"");
        let back: Ipv4 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ip);
        assert!(serde_json::from_str::<Ipv4>("\"10.2.0.0/40\"").is_err());
    }
}
