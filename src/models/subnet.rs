//! Planner subnet entity.

use super::Ipv4;
use crate::cloud::SubnetTier;
use crate::error::CidrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A subnet the user placed inside a VPC plan.
///
/// `cidr` is kept as typed so half-edited values survive; it is parsed when
/// the plan is analysed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    /// Identifier unique within its plan.
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub cidr: String,
    pub tier: SubnetTier,
    /// Availability zone, empty when unassigned.
    #[serde(default)]
    pub az: String,
}

impl Subnet {
    pub fn new(name: &str, cidr: &str, tier: SubnetTier, az: &str) -> Subnet {
        Subnet {
            id: 0,
            name: name.to_string(),
            cidr: cidr.to_string(),
            tier,
            az: az.to_string(),
        }
    }

    /// Parsed block, host bits cleared.
    pub fn block(&self) -> Result<Ipv4, CidrError> {
        Ipv4::new(&self.cidr).map(|b| b.network())
    }
}

impl Default for Subnet {
    fn default() -> Self {
        Subnet {
            id: 0,
            name: "".to_string(),
            cidr: "".to_string(),
            tier: SubnetTier::Private,
            az: "".to_string(),
        }
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}]", self.name, self.cidr, self.tier)?;
        if !self.az.is_empty() {
            write!(f, " {}", self.az)?;
        }
        Ok(())
    }
}
