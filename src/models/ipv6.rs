//! IPv6 address and prefix utilities.
//!
//! All arithmetic runs on `u128`. Address counts are exact powers of two and
//! are carried as [`AddressCount`] so that `/0` (2^128, one past `u128::MAX`)
//! never needs a float or a lossy cast.

use crate::error::{CidrError, SplitError};
use crate::models::ipv4::parse_prefix;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

/// Maximum IPv6 prefix length.
pub const MAX_LENGTH_V6: u8 = 128;

const GROUPS: usize = 8;

lazy_static! {
    static ref HEXTET: Regex = Regex::new(r"^[0-9a-f]{1,4}$").expect("Invalid Regex?");
}

fn parse_groups(part: &str, ip: &str) -> Result<Vec<u16>, CidrError> {
    if part.is_empty() {
        return Ok(vec![]);
    }
    part.split(':')
        .map(|group| {
            if !HEXTET.is_match(group) {
                return Err(CidrError::InvalidIpv6(ip.to_string()));
            }
            u16::from_str_radix(group, 16).map_err(|_| CidrError::InvalidIpv6(ip.to_string()))
        })
        .collect()
}

/// Parse any textual IPv6 form into its eight hextets.
pub fn parse_segments(ip: &str) -> Result<[u16; 8], CidrError> {
    let ip = ip.trim().to_lowercase();
    let groups = match ip.matches("::").count() {
        0 => {
            let groups = parse_groups(&ip, &ip)?;
            if groups.len() != GROUPS {
                return Err(CidrError::InvalidIpv6(ip));
            }
            groups
        }
        1 => {
            let (left, right) = ip
                .split_once("::")
                .ok_or_else(|| CidrError::InvalidIpv6(ip.clone()))?;
            let left = parse_groups(left, &ip)?;
            let right = parse_groups(right, &ip)?;
            // "::" stands for at least one zero group
            if left.len() + right.len() >= GROUPS {
                return Err(CidrError::InvalidIpv6(ip));
            }
            let missing = GROUPS - left.len() - right.len();
            left.into_iter()
                .chain(std::iter::repeat(0).take(missing))
                .chain(right)
                .collect()
        }
        _ => return Err(CidrError::AmbiguousCompression(ip)),
    };
    let mut segments = [0u16; 8];
    segments.copy_from_slice(&groups);
    Ok(segments)
}

fn segments_to_u128(segments: &[u16; 8]) -> u128 {
    segments
        .iter()
        .fold(0u128, |acc, &group| (acc << 16) | u128::from(group))
}

fn u128_to_segments(value: u128) -> [u16; 8] {
    let mut segments = [0u16; 8];
    for (i, segment) in segments.iter_mut().enumerate() {
        *segment = (value >> (16 * (GROUPS - 1 - i))) as u16;
    }
    segments
}

fn expanded_segments(segments: &[u16; 8]) -> String {
    segments
        .iter()
        .map(|g| format!("{g:04x}"))
        .collect::<Vec<String>>()
        .join(":")
}

/// Canonical short form.
///
/// The longest run of two or more zero groups becomes `::`. When two runs
/// have the same length the first one wins (RFC 5952 section 4.2.3).
fn compressed_segments(segments: &[u16; 8]) -> String {
    let mut best: Option<(usize, usize)> = None;
    let mut run_start = None;
    for i in 0..=GROUPS {
        let is_zero = i < GROUPS && segments[i] == 0;
        match (is_zero, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                let len = i - start;
                if len > 1 && best.map_or(true, |(_, best_len)| len > best_len) {
                    best = Some((start, len));
                }
                run_start = None;
            }
            _ => {}
        }
    }
    let hex = |groups: &[u16]| {
        groups
            .iter()
            .map(|g| format!("{g:x}"))
            .collect::<Vec<String>>()
            .join(":")
    };
    match best {
        Some((start, len)) => format!(
            "{}::{}",
            hex(&segments[..start]),
            hex(&segments[start + len..])
        ),
        None => hex(segments),
    }
}

/// Full eight-group form with every group padded to four digits.
pub fn expand_ipv6(ip: &str) -> Result<String, CidrError> {
    parse_segments(ip).map(|s| expanded_segments(&s))
}

pub fn compress_ipv6(ip: &str) -> Result<String, CidrError> {
    parse_segments(ip).map(|s| compressed_segments(&s))
}

pub fn is_valid_ipv6(ip: &str) -> bool {
    parse_segments(ip).is_ok()
}

pub fn ipv6_to_u128(ip: &str) -> Result<u128, CidrError> {
    parse_segments(ip).map(|s| segments_to_u128(&s))
}

/// Compressed text for a 128-bit value.
pub fn u128_to_ipv6(value: u128) -> String {
    compressed_segments(&u128_to_segments(value))
}

pub fn u128_to_ipv6_expanded(value: u128) -> String {
    expanded_segments(&u128_to_segments(value))
}

fn mask_bits_v6(prefix: u8) -> u128 {
    u128::MAX
        .checked_shl(u32::from(MAX_LENGTH_V6.saturating_sub(prefix)))
        .unwrap_or(0)
}

pub fn get_ipv6_network_address(ip: u128, prefix: u8) -> u128 {
    ip & mask_bits_v6(prefix)
}

pub fn get_ipv6_last_address(ip: u128, prefix: u8) -> u128 {
    let mask = mask_bits_v6(prefix);
    (ip & mask) | !mask
}

/// Exact `2^host_bits` address count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddressCount {
    host_bits: u8,
}

impl AddressCount {
    pub fn from_host_bits(host_bits: u8) -> AddressCount {
        AddressCount {
            host_bits: host_bits.min(MAX_LENGTH_V6),
        }
    }

    pub fn host_bits(&self) -> u8 {
        self.host_bits
    }

    /// `None` only for 2^128.
    pub fn as_u128(&self) -> Option<u128> {
        1u128.checked_shl(u32::from(self.host_bits))
    }

    /// Human readable magnitude, e.g. `18.4 quintillion`.
    pub fn formatted(&self) -> String {
        // 2^128 - 1 formats the same as 2^128, no power of ten divides 2^128
        format_large_number(self.as_u128().unwrap_or(u128::MAX))
    }
}

impl fmt::Display for AddressCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_u128() {
            Some(value) => write!(f, "{value}"),
            None => write!(f, "340282366920938463463374607431768211456"),
        }
    }
}

/// Counts leave the crate as decimal strings only.
impl Serialize for AddressCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

pub fn get_ipv6_total_addresses(prefix: u8) -> AddressCount {
    AddressCount::from_host_bits(MAX_LENGTH_V6 - prefix.min(MAX_LENGTH_V6))
}

const MAGNITUDES: [(u32, &str); 11] = [
    (33, "decillion"),
    (30, "nonillion"),
    (27, "octillion"),
    (24, "septillion"),
    (21, "sextillion"),
    (18, "quintillion"),
    (15, "quadrillion"),
    (12, "trillion"),
    (9, "billion"),
    (6, "million"),
    (3, "thousand"),
];

/// Render with the largest named magnitude and one decimal.
///
/// The value is truncated to hundredths of the unit with integer division and
/// then rounded half-up to tenths.
pub fn format_large_number(num: u128) -> String {
    if num < 1000 {
        return num.to_string();
    }
    for (exp, name) in MAGNITUDES {
        let unit = 10u128.pow(exp);
        if num >= unit {
            let hundredths = num / (unit / 100);
            let tenths = (hundredths + 5) / 10;
            return format!("{}.{} {name}", tenths / 10, tenths % 10);
        }
    }
    num.to_string()
}

/// Well-known name for a prefix length.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Ipv6SubnetInfo {
    pub name: String,
    pub description: String,
}

pub fn ipv6_subnet_info(prefix: u8) -> Ipv6SubnetInfo {
    let known = match prefix {
        32 => Some(("RIR Minimum Allocation", "Minimum allocation to ISPs")),
        48 => Some(("Site Prefix", "Standard allocation to sites/organizations")),
        56 => Some((
            "Small Site",
            "Common residential/small office allocation (AWS VPC)",
        )),
        64 => Some(("Subnet", "Standard subnet size, 18 quintillion addresses")),
        128 => Some(("Single Host", "Single IPv6 address")),
        _ => None,
    };
    match known {
        Some((name, description)) => Ipv6SubnetInfo {
            name: name.to_string(),
            description: description.to_string(),
        },
        None => Ipv6SubnetInfo {
            name: format!("/{prefix} Subnet"),
            description: format!("Custom {prefix}-bit prefix"),
        },
    }
}

/// IPv6 block as typed, host bits kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv6Block {
    pub addr: u128,
    pub prefix: u8,
}

impl Ipv6Block {
    pub fn network(&self) -> u128 {
        get_ipv6_network_address(self.addr, self.prefix)
    }

    pub fn last(&self) -> u128 {
        get_ipv6_last_address(self.addr, self.prefix)
    }

    pub fn contains(&self, ip: u128) -> bool {
        get_ipv6_network_address(ip, self.prefix) == self.network()
    }
}

impl fmt::Display for Ipv6Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", u128_to_ipv6(self.addr), self.prefix)
    }
}

pub fn validate_ipv6_cidr(cidr: &str) -> Result<Ipv6Block, CidrError> {
    let cidr = cidr.trim();
    let (ip, prefix) = match cidr.split_once('/') {
        Some((ip, prefix)) if !prefix.is_empty() => (ip, prefix),
        _ => return Err(CidrError::MissingPrefix(cidr.to_string())),
    };
    let addr = ipv6_to_u128(ip)?;
    let prefix = parse_prefix(prefix, MAX_LENGTH_V6)?;
    Ok(Ipv6Block { addr, prefix })
}

pub fn is_valid_ipv6_cidr(cidr: &str) -> bool {
    validate_ipv6_cidr(cidr).is_ok()
}

/// Everything derived from one IPv6 CIDR string.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ipv6CidrInfo {
    pub ip: String,
    pub ip_expanded: String,
    pub prefix: u8,
    pub network_address: String,
    pub network_address_expanded: String,
    pub last_address: String,
    pub last_address_expanded: String,
    pub total_addresses: AddressCount,
    pub total_addresses_formatted: String,
    pub range: String,
    pub subnet_info: Ipv6SubnetInfo,
}

pub fn parse_ipv6_cidr(cidr: &str) -> Result<Ipv6CidrInfo, CidrError> {
    let block = validate_ipv6_cidr(cidr)?;
    let network_address = u128_to_ipv6(block.network());
    let last_address = u128_to_ipv6(block.last());
    let total_addresses = get_ipv6_total_addresses(block.prefix);
    log::debug!("parse_ipv6_cidr({cidr}) network={network_address}/{}", block.prefix);
    Ok(Ipv6CidrInfo {
        ip: u128_to_ipv6(block.addr),
        ip_expanded: u128_to_ipv6_expanded(block.addr),
        prefix: block.prefix,
        network_address_expanded: u128_to_ipv6_expanded(block.network()),
        last_address_expanded: u128_to_ipv6_expanded(block.last()),
        range: format!("{network_address} - {last_address}"),
        network_address,
        last_address,
        total_addresses,
        total_addresses_formatted: total_addresses.formatted(),
        subnet_info: ipv6_subnet_info(block.prefix),
    })
}

/// One child prefix produced by [`split_ipv6_subnet`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ipv6Subnet {
    pub cidr: String,
    pub network: String,
    pub network_expanded: String,
    pub index: usize,
}

/// First `limit` children of `cidr` at `new_prefix`.
pub fn split_ipv6_subnet(
    cidr: &str,
    new_prefix: u8,
    limit: usize,
) -> Result<Vec<Ipv6Subnet>, SplitError> {
    let block = validate_ipv6_cidr(cidr)?;
    if new_prefix <= block.prefix || new_prefix > MAX_LENGTH_V6 {
        return Err(SplitError::NewPrefixTooShort {
            prefix: block.prefix,
            new_prefix,
            max: MAX_LENGTH_V6,
        });
    }
    let count = 1u128
        .checked_shl(u32::from(new_prefix - block.prefix))
        .unwrap_or(u128::MAX);
    let take = count.min(limit as u128) as usize;
    let step = 1u128 << (MAX_LENGTH_V6 - new_prefix);
    let start = block.network();
    Ok((0..take)
        .map(|index| {
            let network = start.wrapping_add(step.wrapping_mul(index as u128));
            let text = u128_to_ipv6(network);
            Ipv6Subnet {
                cidr: format!("{text}/{new_prefix}"),
                network_expanded: u128_to_ipv6_expanded(network),
                network: text,
                index,
            }
        })
        .collect())
}

pub fn is_ipv6_in_subnet(ip: &str, cidr: &str) -> bool {
    match (ipv6_to_u128(ip), validate_ipv6_cidr(cidr)) {
        (Ok(ip), Ok(block)) => block.contains(ip),
        _ => false,
    }
}

/// Address class by leading bits.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv6AddressType {
    Invalid,
    Unspecified,
    Loopback,
    GlobalUnicast,
    UniqueLocal,
    LinkLocal,
    Multicast,
    Ipv4Mapped,
    ReservedOther,
}

impl Ipv6AddressType {
    pub fn name(&self) -> &'static str {
        match self {
            Ipv6AddressType::Invalid => "Invalid",
            Ipv6AddressType::Unspecified => "Unspecified",
            Ipv6AddressType::Loopback => "Loopback",
            Ipv6AddressType::GlobalUnicast => "Global Unicast",
            Ipv6AddressType::UniqueLocal => "Unique Local",
            Ipv6AddressType::LinkLocal => "Link-Local",
            Ipv6AddressType::Multicast => "Multicast",
            Ipv6AddressType::Ipv4Mapped => "IPv4-Mapped",
            Ipv6AddressType::ReservedOther => "Reserved/Other",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Ipv6AddressType::Invalid => "Invalid IPv6 address",
            Ipv6AddressType::Unspecified => "Unspecified address (::)",
            Ipv6AddressType::Loopback => "Loopback address (::1)",
            Ipv6AddressType::GlobalUnicast => "Globally routable unicast address",
            Ipv6AddressType::UniqueLocal => "Unique Local Address (ULA) - private",
            Ipv6AddressType::LinkLocal => "Link-local address (not routable)",
            Ipv6AddressType::Multicast => "Multicast address",
            Ipv6AddressType::Ipv4Mapped => "IPv4-mapped IPv6 address",
            Ipv6AddressType::ReservedOther => "Reserved or other special address",
        }
    }
}

/// (prefix value, prefix length, type), most specific first.
const ADDRESS_CLASSES: [(u128, u8, Ipv6AddressType); 7] = [
    (0, 128, Ipv6AddressType::Unspecified),
    (1, 128, Ipv6AddressType::Loopback),
    (0xffff_0000_0000, 96, Ipv6AddressType::Ipv4Mapped),
    (0xfe80 << 112, 10, Ipv6AddressType::LinkLocal),
    (0xfc00 << 112, 7, Ipv6AddressType::UniqueLocal),
    (0xff00 << 112, 8, Ipv6AddressType::Multicast),
    (0x2000 << 112, 3, Ipv6AddressType::GlobalUnicast),
];

pub fn get_ipv6_address_type(ip: &str) -> Ipv6AddressType {
    let Ok(value) = ipv6_to_u128(ip) else {
        return Ipv6AddressType::Invalid;
    };
    ADDRESS_CLASSES
        .iter()
        .find(|(prefix_value, prefix, _)| get_ipv6_network_address(value, *prefix) == *prefix_value)
        .map(|(_, _, kind)| *kind)
        .unwrap_or(Ipv6AddressType::ReservedOther)
}

/// One row of the IPv6 prefix reference table.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ipv6SubnetSize {
    pub prefix: u8,
    pub cidr: String,
    pub total_addresses: AddressCount,
    pub total_addresses_formatted: String,
    pub name: String,
    pub description: String,
    pub slash64_count: String,
}

const IMPORTANT_PREFIXES: [u8; 16] = [
    32, 36, 40, 44, 48, 52, 56, 60, 64, 96, 112, 120, 124, 126, 127, 128,
];

pub fn get_ipv6_subnet_sizes() -> Vec<Ipv6SubnetSize> {
    IMPORTANT_PREFIXES
        .iter()
        .map(|&prefix| {
            let total = get_ipv6_total_addresses(prefix);
            let info = ipv6_subnet_info(prefix);
            Ipv6SubnetSize {
                prefix,
                cidr: format!("/{prefix}"),
                total_addresses: total,
                total_addresses_formatted: total.formatted(),
                name: info.name,
                description: info.description,
                slash64_count: if prefix <= 64 {
                    format_large_number(1u128 << (64 - prefix))
                } else {
                    "N/A".to_string()
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_ipv6() {
        assert_eq!(
            expand_ipv6("2001:db8::1").unwrap(),
            "2001:0db8:0000:0000:0000:0000:0000:0001"
        );
        assert_eq!(
            expand_ipv6("::").unwrap(),
            "0000:0000:0000:0000:0000:0000:0000:0000"
        );
        assert_eq!(
            expand_ipv6(" FE80::ABCD ").unwrap(),
            "fe80:0000:0000:0000:0000:0000:0000:abcd"
        );
        assert_eq!(
            expand_ipv6("1:2:3:4:5:6:7:8").unwrap(),
            "0001:0002:0003:0004:0005:0006:0007:0008"
        );
    }

    #[test]
    fn test_expand_ipv6_rejects() {
        assert!(matches!(
            expand_ipv6("1::2::3"),
            Err(CidrError::AmbiguousCompression(_))
        ));
        assert!(expand_ipv6("1:2:3:4:5:6:7").is_err());
        assert!(expand_ipv6("1:2:3:4:5:6:7:8:9").is_err());
        assert!(expand_ipv6("1:2:3:4::5:6:7:8").is_err());
        assert!(expand_ipv6("12345::").is_err());
        assert!(expand_ipv6("g::1").is_err());
        assert!(expand_ipv6(":1:2:3:4:5:6:7").is_err());
        assert!(expand_ipv6("").is_err());
    }

    #[test]
    fn test_compress_ipv6() {
        assert_eq!(
            compress_ipv6("2001:0db8:0000:0000:0000:0000:0000:0001").unwrap(),
            "2001:db8::1"
        );
        assert_eq!(compress_ipv6("0:0:0:0:0:0:0:0").unwrap(), "::");
        assert_eq!(compress_ipv6("0:0:0:0:0:0:0:1").unwrap(), "::1");
        assert_eq!(compress_ipv6("fe80:0:0:0:0:0:0:0").unwrap(), "fe80::");
        // single zero group is never compressed
        assert_eq!(
            compress_ipv6("2001:db8:0:1:1:1:1:1").unwrap(),
            "2001:db8:0:1:1:1:1:1"
        );
        // the longer run wins
        assert_eq!(
            compress_ipv6("2001:0:0:1:0:0:0:1").unwrap(),
            "2001:0:0:1::1"
        );
    }

    #[test]
    fn test_compress_tie_prefers_first_run() {
        assert_eq!(
            compress_ipv6("2001:db8:0:0:1:0:0:1").unwrap(),
            "2001:db8::1:0:0:1"
        );
        assert_eq!(compress_ipv6("0:0:1:1:1:1:0:0").unwrap(), "::1:1:1:1:0:0");
    }

    #[test]
    fn test_compress_is_stable() {
        for ip in [
            "2001:db8::1",
            "0:0:1:1:1:1:0:0",
            "fe80::1:0:0:0",
            "1:0:0:2:0:0:3:4",
            "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff",
        ] {
            let once = compress_ipv6(&expand_ipv6(ip).unwrap()).unwrap();
            let twice = compress_ipv6(&once).unwrap();
            assert_eq!(once, twice, "compression of {ip} is not stable");
        }
    }

    #[test]
    fn test_u128_round_trip() {
        let value = ipv6_to_u128("2001:db8::ff").unwrap();
        assert_eq!(value, 0x2001_0db8_0000_0000_0000_0000_0000_00ff);
        assert_eq!(u128_to_ipv6(value), "2001:db8::ff");
        assert_eq!(u128_to_ipv6(u128::MAX), "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff");
    }

    #[test]
    fn test_network_and_last_address() {
        let ip = ipv6_to_u128("2001:db8:abcd:12::1").unwrap();
        assert_eq!(u128_to_ipv6(get_ipv6_network_address(ip, 48)), "2001:db8:abcd::");
        assert_eq!(
            u128_to_ipv6(get_ipv6_last_address(ip, 48)),
            "2001:db8:abcd:ffff:ffff:ffff:ffff:ffff"
        );
        assert_eq!(get_ipv6_network_address(ip, 0), 0);
        assert_eq!(get_ipv6_last_address(ip, 0), u128::MAX);
        assert_eq!(get_ipv6_network_address(ip, 128), ip);
        assert_eq!(get_ipv6_last_address(ip, 128), ip);
    }

    #[test]
    fn test_total_addresses_exact() {
        assert_eq!(get_ipv6_total_addresses(128).as_u128(), Some(1));
        assert_eq!(get_ipv6_total_addresses(64).as_u128(), Some(1u128 << 64));
        assert_eq!(get_ipv6_total_addresses(1).as_u128(), Some(1u128 << 127));
        assert_eq!(get_ipv6_total_addresses(0).as_u128(), None);
        assert_eq!(
            get_ipv6_total_addresses(0).to_string(),
            "340282366920938463463374607431768211456"
        );
        assert_eq!(
            get_ipv6_total_addresses(64).to_string(),
            "18446744073709551616"
        );
        // beyond 2^53 the exact value survives
        assert_eq!(
            get_ipv6_total_addresses(74).to_string(),
            "18014398509481984"
        );
    }

    #[test]
    fn test_format_large_number() {
        assert_eq!(format_large_number(999), "999");
        assert_eq!(format_large_number(1000), "1.0 thousand");
        assert_eq!(format_large_number(65536), "65.5 thousand");
        assert_eq!(format_large_number(1u128 << 64), "18.4 quintillion");
        assert_eq!(format_large_number(1u128 << 72), "4.7 sextillion");
        assert_eq!(get_ipv6_total_addresses(0).formatted(), "340282.4 decillion");
    }

    #[test]
    fn test_parse_ipv6_cidr_small_site() {
        let info = parse_ipv6_cidr("2600:1f18::/56").unwrap();
        assert_eq!(info.network_address, "2600:1f18::");
        assert_eq!(info.last_address, "2600:1f18:0:ff:ffff:ffff:ffff:ffff");
        assert_eq!(info.total_addresses.as_u128(), Some(1u128 << 72));
        assert!(info.total_addresses_formatted.ends_with("sextillion"));
        assert_eq!(info.subnet_info.name, "Small Site");
        assert_eq!(info.range, "2600:1f18:: - 2600:1f18:0:ff:ffff:ffff:ffff:ffff");
    }

    #[test]
    fn test_parse_ipv6_cidr_errors() {
        assert!(matches!(
            parse_ipv6_cidr("2001:db8::"),
            Err(CidrError::MissingPrefix(_))
        ));
        assert!(matches!(
            parse_ipv6_cidr("2001:db8::/129"),
            Err(CidrError::PrefixOutOfRange { max: 128, .. })
        ));
        assert!(matches!(
            parse_ipv6_cidr("2001::db8::/64"),
            Err(CidrError::AmbiguousCompression(_))
        ));
        assert_eq!(parse_ipv6_cidr("::/0").unwrap().subnet_info.name, "/0 Subnet");
    }

    #[test]
    fn test_total_addresses_serialize_as_string() {
        let info = parse_ipv6_cidr("2001:db8::/64").unwrap();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["totalAddresses"], "18446744073709551616");
        assert_eq!(json["subnetInfo"]["name"], "Subnet");
    }

    #[test]
    fn test_split_ipv6_subnet() {
        let subnets = split_ipv6_subnet("2001:db8::/48", 64, 3).unwrap();
        let cidrs: Vec<&str> = subnets.iter().map(|s| s.cidr.as_str()).collect();
        assert_eq!(
            cidrs,
            vec!["2001:db8::/64", "2001:db8:0:1::/64", "2001:db8:0:2::/64"]
        );
        assert_eq!(split_ipv6_subnet("::/0", 128, 256).unwrap().len(), 256);
        assert_eq!(split_ipv6_subnet("2001:db8::/126", 128, 256).unwrap().len(), 4);
        assert!(split_ipv6_subnet("2001:db8::/64", 64, 10).is_err());
    }

    #[test]
    fn test_is_ipv6_in_subnet() {
        assert!(is_ipv6_in_subnet("2001:db8::1", "2001:db8::/32"));
        assert!(!is_ipv6_in_subnet("2001:db9::1", "2001:db8::/32"));
        assert!(!is_ipv6_in_subnet("nope", "2001:db8::/32"));
    }

    #[test]
    fn test_address_types() {
        assert_eq!(get_ipv6_address_type("::"), Ipv6AddressType::Unspecified);
        assert_eq!(get_ipv6_address_type("::1"), Ipv6AddressType::Loopback);
        assert_eq!(get_ipv6_address_type("2001:db8::1"), Ipv6AddressType::GlobalUnicast);
        assert_eq!(get_ipv6_address_type("3fff::1"), Ipv6AddressType::GlobalUnicast);
        assert_eq!(get_ipv6_address_type("fd12:3456::1"), Ipv6AddressType::UniqueLocal);
        assert_eq!(get_ipv6_address_type("fc00::"), Ipv6AddressType::UniqueLocal);
        assert_eq!(get_ipv6_address_type("fe80::1"), Ipv6AddressType::LinkLocal);
        assert_eq!(get_ipv6_address_type("febf::1"), Ipv6AddressType::LinkLocal);
        assert_eq!(get_ipv6_address_type("fec0::1"), Ipv6AddressType::ReservedOther);
        assert_eq!(get_ipv6_address_type("ff02::1"), Ipv6AddressType::Multicast);
        assert_eq!(get_ipv6_address_type("::ffff:a00:1"), Ipv6AddressType::Ipv4Mapped);
        assert_eq!(get_ipv6_address_type("::2"), Ipv6AddressType::ReservedOther);
        assert_eq!(get_ipv6_address_type("zz::"), Ipv6AddressType::Invalid);
        assert_eq!(Ipv6AddressType::UniqueLocal.name(), "Unique Local");
    }

    #[test]
    fn test_subnet_sizes_table() {
        let sizes = get_ipv6_subnet_sizes();
        assert_eq!(sizes.len(), 16);
        let slash48 = sizes.iter().find(|s| s.prefix == 48).unwrap();
        assert_eq!(slash48.slash64_count, "65.5 thousand");
        assert_eq!(slash48.name, "Site Prefix");
        let slash128 = sizes.iter().find(|s| s.prefix == 128).unwrap();
        assert_eq!(slash128.slash64_count, "N/A");
        assert_eq!(slash128.total_addresses_formatted, "1");
    }
}
