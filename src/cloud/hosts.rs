//! Usable host counts and concrete reserved addresses per provider.

use super::profile::ReservedOffset;
use super::Provider;
use crate::models::get_total_hosts;
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;

/// Why a block has fewer (or different) usable hosts than expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostWarning {
    PointToPoint,
    SingleHost,
    UnsupportedSubnetSize { provider: &'static str, min_prefix: u8 },
    NoUsableHosts,
}

impl fmt::Display for HostWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostWarning::PointToPoint => write!(f, "Point-to-point link"),
            HostWarning::SingleHost => write!(f, "Single host"),
            HostWarning::UnsupportedSubnetSize {
                provider,
                min_prefix,
            } => write!(
                f,
                "{provider} does not support subnets smaller than /{min_prefix}"
            ),
            HostWarning::NoUsableHosts => write!(f, "No usable hosts in this subnet"),
        }
    }
}

impl Serialize for HostWarning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CloudUsableHosts {
    pub total: u64,
    pub reserved: u64,
    pub usable: u64,
    pub warning: Option<HostWarning>,
    pub is_valid: bool,
}

/// Usable hosts for a `/prefix` block under `provider`'s reservations.
///
/// # Arguments
/// * `prefix` - CIDR prefix length (0-32)
/// * `provider` - Reservation policy to apply
///
/// # Returns
/// Counts plus an optional warning. A block below the provider's minimum size
/// still returns a result, with `usable == 0` and `is_valid == false`.
pub fn get_cloud_usable_hosts(prefix: u8, provider: Provider) -> CloudUsableHosts {
    let profile = provider.profile();
    let total = get_total_hosts(prefix);

    if prefix >= 31 {
        return CloudUsableHosts {
            total,
            reserved: 0,
            usable: total,
            warning: Some(if prefix == 31 {
                HostWarning::PointToPoint
            } else {
                HostWarning::SingleHost
            }),
            is_valid: true,
        };
    }

    let reserved = u64::from(profile.reserved_count);
    if prefix > profile.min_subnet_prefix {
        log::debug!(
            "/{prefix} is below the {} minimum /{}",
            profile.short_name,
            profile.min_subnet_prefix
        );
        return CloudUsableHosts {
            total,
            reserved,
            usable: 0,
            warning: Some(HostWarning::UnsupportedSubnetSize {
                provider: profile.short_name,
                min_prefix: profile.min_subnet_prefix,
            }),
            is_valid: false,
        };
    }

    let usable = total.saturating_sub(reserved);
    CloudUsableHosts {
        total,
        reserved,
        usable,
        warning: (usable == 0).then_some(HostWarning::NoUsableHosts),
        is_valid: usable > 0,
    }
}

/// One reserved address resolved against a concrete network.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReservedIp {
    pub ip: Ipv4Addr,
    pub offset: u64,
    pub name: &'static str,
    pub description: &'static str,
}

fn at_offset(network: Ipv4Addr, offset: u64) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(network).wrapping_add(offset as u32))
}

/// Reserved addresses of `network/prefix` in the provider's declared order.
///
/// Offsets that do not fit in the block (a /31 under a cloud profile) are
/// left out.
pub fn get_reserved_ip_details(
    network: Ipv4Addr,
    prefix: u8,
    provider: Provider,
) -> Vec<ReservedIp> {
    let total = get_total_hosts(prefix);
    provider
        .profile()
        .reserved_ips
        .iter()
        .filter_map(|reservation| {
            let offset = reservation.offset.resolve(total)?;
            Some(ReservedIp {
                ip: at_offset(network, offset),
                offset,
                name: reservation.name,
                description: reservation.description,
            })
        })
        .collect()
}

/// First address after the contiguous low reservations.
pub fn get_cloud_first_usable_ip(network: Ipv4Addr, _prefix: u8, provider: Provider) -> Ipv4Addr {
    let profile = provider.profile();
    debug_assert!(profile.low_offsets_contiguous());
    let highest_low = profile
        .reserved_ips
        .iter()
        .filter_map(|r| match r.offset {
            ReservedOffset::Offset(n) => Some(u64::from(n)),
            _ => None,
        })
        .max()
        .unwrap_or(0);
    at_offset(network, highest_low + 1)
}

/// Last address before the reservations anchored at the end of the block.
pub fn get_cloud_last_usable_ip(network: Ipv4Addr, prefix: u8, provider: Provider) -> Ipv4Addr {
    let end_reserved = provider
        .profile()
        .reserved_ips
        .iter()
        .filter(|r| r.offset.is_end_anchored())
        .count() as u64;
    let total = get_total_hosts(prefix);
    at_offset(network, total.saturating_sub(1 + end_reserved))
}
