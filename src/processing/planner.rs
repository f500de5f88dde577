//! Plan analysis and quick-add layouts.

use super::allocator::{find_free_blocks, find_gaps, FreeBlock};
use super::overlap::{find_overlapping_subnets, find_subnets_outside, PlanWarning};
use crate::cloud::{
    get_availability_zones, get_cloud_first_usable_ip, get_cloud_last_usable_ip,
    get_cloud_usable_hosts, CloudUsableHosts, SubnetTier,
};
use crate::error::{CidrError, SplitError};
use crate::models::{split_block, Ipv4, Subnet, VpcPlan};
use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpaceAnalysis {
    #[serde(rename = "totalIPs")]
    pub total_ips: u64,
    #[serde(rename = "usedIPs")]
    pub used_ips: u64,
    /// Negative when subnets overlap or spill outside the VPC.
    #[serde(rename = "remainingIPs")]
    pub remaining_ips: i64,
    pub used_percent: f64,
}

/// Derived view of one planned subnet.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetReport {
    pub id: u64,
    pub name: String,
    pub cidr: String,
    pub tier: SubnetTier,
    pub az: String,
    pub block: Option<Ipv4>,
    pub hosts: Option<CloudUsableHosts>,
    pub first_usable: Option<Ipv4Addr>,
    pub last_usable: Option<Ipv4Addr>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub vpc: Ipv4,
    pub space: SpaceAnalysis,
    pub overlaps: Vec<(String, String)>,
    pub outside_vpc: Vec<String>,
    pub subnets: Vec<SubnetReport>,
    pub gaps: Vec<Ipv4>,
    pub warnings: Vec<PlanWarning>,
}

fn report_subnet(plan: &VpcPlan, subnet: &Subnet, warnings: &mut Vec<PlanWarning>) -> SubnetReport {
    let mut report = SubnetReport {
        id: subnet.id,
        name: subnet.name.clone(),
        cidr: subnet.cidr.clone(),
        tier: subnet.tier,
        az: subnet.az.clone(),
        block: None,
        hosts: None,
        first_usable: None,
        last_usable: None,
    };
    match subnet.block() {
        Ok(block) => {
            let hosts = get_cloud_usable_hosts(block.mask, plan.provider);
            if let (false, Some(warning)) = (hosts.is_valid, &hosts.warning) {
                warnings.push(PlanWarning::cloud_size(&subnet.name, warning));
            }
            if hosts.usable > 0 && block.mask < 31 {
                let (addr, mask) = (block.addr, block.mask);
                report.first_usable = Some(get_cloud_first_usable_ip(addr, mask, plan.provider));
                report.last_usable = Some(get_cloud_last_usable_ip(addr, mask, plan.provider));
            }
            report.block = Some(block);
            report.hosts = Some(hosts);
        }
        Err(e) => warnings.push(PlanWarning::InvalidCidr {
            name: subnet.name.clone(),
            cidr: subnet.cidr.clone(),
            reason: e.to_string(),
        }),
    }
    report
}

/// Space usage, warnings and free gaps of a plan.
///
/// Only an unparsable VPC CIDR is an error. Problems with individual subnets
/// end up in `warnings` and the rest of the plan is still analysed.
pub fn analyze_plan(plan: &VpcPlan) -> Result<PlanReport, CidrError> {
    let vpc = plan.block()?;
    let mut warnings = Vec::new();

    let subnets: Vec<SubnetReport> = plan
        .subnets
        .iter()
        .map(|s| report_subnet(plan, s, &mut warnings))
        .collect();
    let blocks: Vec<Ipv4> = subnets.iter().filter_map(|s| s.block).collect();

    let total_ips = vpc.size();
    let used_ips: u64 = blocks.iter().map(|b| b.size()).sum();
    let space = SpaceAnalysis {
        total_ips,
        used_ips,
        remaining_ips: total_ips as i64 - used_ips as i64,
        used_percent: used_ips as f64 / total_ips as f64 * 100.0,
    };

    let overlaps = find_overlapping_subnets(&plan.subnets);
    warnings.extend(overlaps.iter().map(|(first, second)| PlanWarning::Overlap {
        first: first.clone(),
        second: second.clone(),
    }));

    let outside = find_subnets_outside(vpc, &plan.subnets);
    warnings.extend(outside.iter().map(|s| PlanWarning::OutsideVpc {
        name: s.name.clone(),
        cidr: s.cidr.clone(),
    }));
    let outside_vpc: Vec<String> = outside.iter().map(|s| s.name.clone()).collect();

    log::debug!(
        "analyze_plan({}) used {}/{} with {} warning(s)",
        plan.name,
        used_ips,
        total_ips,
        warnings.len()
    );
    Ok(PlanReport {
        vpc,
        space,
        overlaps,
        outside_vpc,
        gaps: find_gaps(vpc, &blocks),
        subnets,
        warnings,
    })
}

/// Free `/requested_prefix` blocks left in the plan's VPC.
pub fn plan_free_blocks(
    plan: &VpcPlan,
    requested_prefix: u8,
    limit: usize,
) -> Result<Vec<FreeBlock>, CidrError> {
    let vpc = plan.block()?;
    let allocated: Vec<Ipv4> = plan.subnets.iter().filter_map(|s| s.block().ok()).collect();
    Ok(find_free_blocks(vpc, &allocated, requested_prefix, limit))
}

/// Canned subnet layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAddPattern {
    /// Public, private and database tier in two zones.
    ThreeTierTwoAz,
    /// Public and private tier in three zones.
    TwoTierThreeAz,
}

impl QuickAddPattern {
    pub fn id(&self) -> &'static str {
        match self {
            QuickAddPattern::ThreeTierTwoAz => "3-tier-2az",
            QuickAddPattern::TwoTierThreeAz => "2-tier-3az",
        }
    }

    /// (name, tier, zone index) per split block, in address order.
    fn layout(&self) -> [(&'static str, SubnetTier, usize); 6] {
        match self {
            QuickAddPattern::ThreeTierTwoAz => [
                ("public-az1", SubnetTier::Public, 0),
                ("public-az2", SubnetTier::Public, 1),
                ("private-az1", SubnetTier::Private, 0),
                ("private-az2", SubnetTier::Private, 1),
                ("database-az1", SubnetTier::Database, 0),
                ("database-az2", SubnetTier::Database, 1),
            ],
            QuickAddPattern::TwoTierThreeAz => [
                ("public-az1", SubnetTier::Public, 0),
                ("public-az2", SubnetTier::Public, 1),
                ("public-az3", SubnetTier::Public, 2),
                ("private-az1", SubnetTier::Private, 0),
                ("private-az2", SubnetTier::Private, 1),
                ("private-az3", SubnetTier::Private, 2),
            ],
        }
    }
}

impl fmt::Display for QuickAddPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for QuickAddPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "3-tier-2az" => Ok(QuickAddPattern::ThreeTierTwoAz),
            "2-tier-3az" => Ok(QuickAddPattern::TwoTierThreeAz),
            other => Err(format!("Unknown quick-add pattern: {other}")),
        }
    }
}

/// Replace the plan's subnets with a canned layout.
///
/// The VPC is split at its prefix + 8 and the first six blocks are assigned
/// in order. Zones come from the plan's provider and region; a region with
/// fewer zones than the pattern needs reuses the first zone.
pub fn quick_add(plan: &mut VpcPlan, pattern: QuickAddPattern) -> Result<Vec<u64>, SplitError> {
    let vpc = plan.block()?;
    let splits = split_block(vpc, vpc.mask + 8)?;
    let zones = get_availability_zones(plan.provider, &plan.region);
    let subnets = pattern
        .layout()
        .iter()
        .zip(splits)
        .map(|(&(name, tier, zone), block)| {
            let az = zones.get(zone).or(zones.first()).cloned().unwrap_or_default();
            Subnet::new(name, &block.to_string(), tier, &az)
        })
        .collect();
    log::info!("quick_add {pattern} on {}", plan.cidr);
    Ok(plan.replace_subnets(subnets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::Provider;

    fn plan() -> VpcPlan {
        VpcPlan::new("main-vpc", "10.0.0.0/16", Provider::Aws, "us-east-1")
    }

    #[test]
    fn test_analyze_empty_plan() {
        let report = analyze_plan(&plan()).unwrap();
        assert_eq!(report.space.total_ips, 65536);
        assert_eq!(report.space.used_ips, 0);
        assert_eq!(report.space.remaining_ips, 65536);
        assert!(report.warnings.is_empty());
        assert_eq!(report.gaps, vec![Ipv4::new("10.0.0.0/16").unwrap()]);
    }

    #[test]
    fn test_analyze_plan_warnings() {
        let mut plan = plan();
        plan.add_subnet(Subnet::new("web", "10.0.0.0/24", SubnetTier::Public, "us-east-1a"));
        plan.add_subnet(Subnet::new("web-half", "10.0.0.128/25", SubnetTier::Public, ""));
        plan.add_subnet(Subnet::new("stray", "192.168.0.0/24", SubnetTier::Private, ""));
        plan.add_subnet(Subnet::new("tiny", "10.0.9.0/29", SubnetTier::Private, ""));
        plan.add_subnet(Subnet::new("typo", "10.0.300.0/24", SubnetTier::Private, ""));

        let report = analyze_plan(&plan).unwrap();
        assert_eq!(report.overlaps, vec![("web".to_string(), "web-half".to_string())]);
        assert_eq!(report.outside_vpc, vec!["stray"]);
        assert_eq!(report.space.used_ips, 256 + 128 + 256 + 8);
        assert_eq!(report.warnings.len(), 4);
        let tiny = "Subnet 'tiny': AWS does not support subnets smaller than /28";
        assert!(report.warnings.iter().any(|w| w.to_string() == tiny));
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, PlanWarning::InvalidCidr { name, .. } if name == "typo")));

        let web = &report.subnets[0];
        assert_eq!(web.hosts.as_ref().unwrap().usable, 251);
        assert_eq!(web.first_usable, Some(Ipv4Addr::new(10, 0, 0, 4)));
        assert_eq!(web.last_usable, Some(Ipv4Addr::new(10, 0, 0, 254)));
        assert!(report.subnets[4].block.is_none());
    }

    #[test]
    fn test_outside_warning_keeps_cidr_of_duplicate_name() {
        let mut plan = plan();
        plan.add_subnet(Subnet::new("web", "10.0.1.0/24", SubnetTier::Public, ""));
        plan.add_subnet(Subnet::new("web", "192.168.0.0/24", SubnetTier::Public, ""));
        plan.add_subnet(Subnet::new("web", "172.16.0.0/24", SubnetTier::Public, ""));

        let report = analyze_plan(&plan).unwrap();
        let outside: Vec<(String, String)> = report
            .warnings
            .iter()
            .filter_map(|w| match w {
                PlanWarning::OutsideVpc { name, cidr } => Some((name.clone(), cidr.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(
            outside,
            vec![
                ("web".to_string(), "192.168.0.0/24".to_string()),
                ("web".to_string(), "172.16.0.0/24".to_string()),
            ]
        );
        assert_eq!(report.outside_vpc, vec!["web", "web"]);
    }

    #[test]
    fn test_analyze_plan_bad_vpc() {
        let plan = VpcPlan::new("x", "10.0.0.0", Provider::Aws, "us-east-1");
        assert!(matches!(analyze_plan(&plan), Err(CidrError::MissingPrefix(_))));
    }

    #[test]
    fn test_plan_free_blocks() {
        let mut plan = plan();
        plan.add_subnet(Subnet::new("web", "10.0.0.0/24", SubnetTier::Public, ""));
        let free = plan_free_blocks(&plan, 24, 2).unwrap();
        assert_eq!(free.len(), 2);
        assert_eq!(free[0].cidr.to_string(), "10.0.1.0/24");
        assert!(free[0].contiguous);
    }

    #[test]
    fn test_quick_add_three_tier() {
        let mut plan = plan();
        let ids = quick_add(&mut plan, QuickAddPattern::ThreeTierTwoAz).unwrap();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        let cidrs: Vec<&str> = plan.subnets.iter().map(|s| s.cidr.as_str()).collect();
        assert_eq!(
            cidrs,
            vec![
                "10.0.0.0/24",
                "10.0.1.0/24",
                "10.0.2.0/24",
                "10.0.3.0/24",
                "10.0.4.0/24",
                "10.0.5.0/24"
            ]
        );
        assert_eq!(plan.subnets[4].name, "database-az1");
        assert_eq!(plan.subnets[4].az, "us-east-1a");
        assert_eq!(plan.subnets[5].az, "us-east-1b");
        assert!(analyze_plan(&plan).unwrap().warnings.is_empty());
    }

    #[test]
    fn test_quick_add_two_tier_reuses_first_zone() {
        let mut plan = VpcPlan::new("west", "172.16.0.0/12", Provider::Aws, "us-west-1");
        quick_add(&mut plan, "2-tier-3az".parse().unwrap()).unwrap();
        assert_eq!(plan.subnets[2].name, "public-az3");
        assert_eq!(plan.subnets[2].cidr, "172.16.32.0/20");
        assert_eq!(plan.subnets[2].az, "us-west-1a");
    }

    #[test]
    fn test_quick_add_too_small() {
        let mut plan = VpcPlan::new("small", "10.0.0.0/25", Provider::Aws, "us-east-1");
        assert!(quick_add(&mut plan, QuickAddPattern::ThreeTierTwoAz).is_err());
        assert!("4-tier".parse::<QuickAddPattern>().is_err());
    }
}
