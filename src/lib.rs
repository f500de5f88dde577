//! Network calculator library.
//!
//! Provides the building blocks behind the `subnet-zero` tool:
//! - IPv4 and IPv6 address math
//! - cloud provider reserved-address policy and VPC planning
//! - free-space search inside a parent block
//! - DHCP option encoding and server config export
//! - shareable session state

pub mod cli;
pub mod cloud;
pub mod config;
pub mod dhcp;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;
pub mod state;

// Re-export commonly used types at crate root
pub use cloud::{get_cloud_usable_hosts, Provider};
pub use error::{CidrError, DhcpError, SplitError, StateError};
pub use models::{parse_cidr, parse_ipv6_cidr, Ipv4, Subnet, VpcPlan};
pub use processing::{analyze_plan, find_free_blocks, FreeBlock, PlanWarning};
