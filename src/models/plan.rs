//! VPC/VNet plan: a parent block and the subnets placed in it.

use super::{Ipv4, Subnet};
use crate::cloud::Provider;
use crate::error::CidrError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Zone label used for subnets without an availability zone.
pub const UNASSIGNED_AZ: &str = "Unassigned";

/// In-memory planner session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VpcPlan {
    pub name: String,
    pub cidr: String,
    pub provider: Provider,
    pub region: String,
    pub subnets: Vec<Subnet>,
    #[serde(skip)]
    next_id: u64,
}

impl VpcPlan {
    pub fn new(name: &str, cidr: &str, provider: Provider, region: &str) -> VpcPlan {
        VpcPlan {
            name: name.to_string(),
            cidr: cidr.to_string(),
            provider,
            region: region.to_string(),
            subnets: vec![],
            next_id: 1,
        }
    }

    pub fn block(&self) -> Result<Ipv4, CidrError> {
        Ipv4::new(&self.cidr).map(|b| b.network())
    }

    /// Add a subnet and return the id it was given.
    pub fn add_subnet(&mut self, mut subnet: Subnet) -> u64 {
        // deserialized plans start at 0, never hand out an id already in use
        let max_id = self.subnets.iter().map(|s| s.id).max().unwrap_or(0);
        let id = self.next_id.max(max_id + 1);
        self.next_id = id + 1;
        subnet.id = id;
        log::debug!("add_subnet id={id} {subnet}");
        self.subnets.push(subnet);
        id
    }

    /// Give every missing (0) or repeated id a fresh one after loading a plan
    /// from JSON. The first subnet holding an id keeps it. Returns how many
    /// subnets were renumbered.
    pub fn normalize_ids(&mut self) -> usize {
        let mut next = self.subnets.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let mut seen = HashSet::new();
        let mut renumbered = 0;
        for subnet in &mut self.subnets {
            if subnet.id == 0 || !seen.insert(subnet.id) {
                subnet.id = next;
                seen.insert(next);
                next += 1;
                renumbered += 1;
            }
        }
        self.next_id = self.next_id.max(next);
        if renumbered > 0 {
            log::debug!("normalize_ids({}) renumbered {renumbered} subnet(s)", self.name);
        }
        renumbered
    }

    pub fn remove_subnet(&mut self, id: u64) -> Option<Subnet> {
        let index = self.subnets.iter().position(|s| s.id == id)?;
        Some(self.subnets.remove(index))
    }

    /// Replace the subnet with `id`, keeping the id. Returns false when no
    /// such subnet exists.
    pub fn update_subnet(&mut self, id: u64, mut subnet: Subnet) -> bool {
        match self.subnets.iter_mut().find(|s| s.id == id) {
            Some(existing) => {
                subnet.id = id;
                *existing = subnet;
                true
            }
            None => false,
        }
    }

    pub fn get_subnet(&self, id: u64) -> Option<&Subnet> {
        self.subnets.iter().find(|s| s.id == id)
    }

    /// Drop every subnet and start ids again.
    pub fn replace_subnets(&mut self, subnets: Vec<Subnet>) -> Vec<u64> {
        self.subnets.clear();
        self.next_id = 1;
        subnets.into_iter().map(|s| self.add_subnet(s)).collect()
    }

    /// Subnets grouped by availability zone, zone names sorted.
    pub fn subnets_by_az(&self) -> BTreeMap<&str, Vec<&Subnet>> {
        let mut zones: BTreeMap<&str, Vec<&Subnet>> = BTreeMap::new();
        for subnet in &self.subnets {
            let az = if subnet.az.is_empty() {
                UNASSIGNED_AZ
            } else {
                subnet.az.as_str()
            };
            zones.entry(az).or_default().push(subnet);
        }
        zones
    }
}

impl fmt::Display for VpcPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} [{}] ({} subnets, {} {})",
            self.name,
            self.cidr,
            self.subnets.len(),
            self.provider,
            self.region
        )?;
        for subnet in &self.subnets {
            writeln!(f, "  - {subnet}")?;
        }
        Ok(())
    }
}
