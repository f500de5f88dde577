//! Cloud provider reserved-address policy.
//!
//! - [`profile`] - static per-provider reservation tables
//! - [`hosts`] - usable host counts and reserved/first/last address derivation
//! - [`catalog`] - sizing recommendations, subnet tiers and availability zones

mod catalog;
mod hosts;
mod profile;

pub use catalog::{
    get_availability_zones, get_recommended_subnets, get_vpc_size_recommendations,
    RecommendedSubnet, SubnetTier, TierInfo, VpcSizeRecommendation,
};
pub use hosts::{
    get_cloud_first_usable_ip, get_cloud_last_usable_ip, get_cloud_usable_hosts,
    get_reserved_ip_details, CloudUsableHosts, HostWarning, ReservedIp,
};
pub use profile::{ProviderProfile, Reservation, ReservedOffset};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Address-reservation policy a block is evaluated against.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
    Traditional,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Aws,
        Provider::Azure,
        Provider::Gcp,
        Provider::Traditional,
    ];

    /// Lenient lookup, anything unknown is treated as on-premises.
    pub fn from_id(id: &str) -> Provider {
        match id.trim().to_lowercase().as_str() {
            "aws" => Provider::Aws,
            "azure" => Provider::Azure,
            "gcp" => Provider::Gcp,
            "traditional" => Provider::Traditional,
            other => {
                log::debug!("Unknown provider '{other}', using traditional");
                Provider::Traditional
            }
        }
    }

    /// Strict lookup used when validating share state.
    pub fn parse_strict(id: &str) -> Option<Provider> {
        Provider::ALL.into_iter().find(|p| p.id() == id)
    }

    pub fn id(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::Gcp => "gcp",
            Provider::Traditional => "traditional",
        }
    }

    pub fn profile(&self) -> &'static ProviderProfile {
        profile::profile_for(*self)
    }
}

impl Default for Provider {
    fn default() -> Self {
        Provider::Traditional
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Provider {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Provider::from_id(s))
    }
}
