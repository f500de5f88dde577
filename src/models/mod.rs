//! Domain models for subnet planning.
//!
//! This module contains the core data structures and address math:
//! - [`Ipv4`] - IPv4 block with CIDR notation support, plus IPv4 helpers
//! - [`ipv6`] - 128-bit IPv6 math and exact address counts
//! - [`Subnet`] - planner subnet entity
//! - [`VpcPlan`] - parent block with its subnets

pub mod ipv4;
pub mod ipv6;
mod plan;
mod subnet;

// Re-export public types
pub use ipv4::{
    broadcast_addr, cut_addr, do_subnets_overlap, get_all_subnet_sizes, get_broadcast_address,
    get_cidr_mask, get_first_host, get_last_host, get_network_address, get_private_ranges,
    get_total_hosts, get_usable_hosts, int_to_ip, ip_after_subnet, ip_to_binary, ip_to_int,
    is_ip_in_subnet, is_private_ip, is_valid_cidr, is_valid_ipv4, list_subnet_ips, lo_mask,
    next_subnet_ipv4, parse_cidr, parse_ipv4, prefix_to_subnet_mask, prefix_to_wildcard,
    split_block, split_subnet, supernet_subnets, validate_cidr, CidrInfo, Ipv4, IpRole, ListedIp,
    PrivateRange, SubnetSize, MAX_LENGTH,
};
pub use ipv6::{
    compress_ipv6, expand_ipv6, format_large_number, get_ipv6_address_type,
    get_ipv6_last_address, get_ipv6_network_address, get_ipv6_subnet_sizes,
    get_ipv6_total_addresses, ipv6_to_u128, is_ipv6_in_subnet, is_valid_ipv6, is_valid_ipv6_cidr,
    parse_ipv6_cidr, split_ipv6_subnet, u128_to_ipv6, AddressCount, Ipv6AddressType, Ipv6Block,
    Ipv6CidrInfo,
};
pub use plan::{VpcPlan, UNASSIGNED_AZ};
pub use subnet::Subnet;
