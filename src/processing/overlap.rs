//! Overlap and containment checks for planned subnets.
//!
//! Problems found here are warnings. The plan is still analysed and the
//! caller decides what to show.

use crate::cloud::HostWarning;
use crate::models::{do_subnets_overlap, Ipv4, Subnet};
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

/// Policy problem attached to a plan report.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PlanWarning {
    Overlap { first: String, second: String },
    OutsideVpc { name: String, cidr: String },
    InvalidCidr { name: String, cidr: String, reason: String },
    CloudSize { name: String, message: String },
}

impl PlanWarning {
    pub fn cloud_size(name: &str, warning: &HostWarning) -> PlanWarning {
        PlanWarning::CloudSize {
            name: name.to_string(),
            message: warning.to_string(),
        }
    }
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::Overlap { first, second } => {
                write!(f, "Subnets '{first}' and '{second}' overlap")
            }
            PlanWarning::OutsideVpc { name, cidr } => {
                write!(f, "Subnet '{name}' ({cidr}) is outside the VPC range")
            }
            PlanWarning::InvalidCidr { name, cidr, reason } => {
                write!(f, "Subnet '{name}' has an invalid CIDR '{cidr}': {reason}")
            }
            PlanWarning::CloudSize { name, message } => write!(f, "Subnet '{name}': {message}"),
        }
    }
}

/// Every overlapping pair of subnet names, in plan order.
///
/// Subnets with an unparsable CIDR never overlap anything.
pub fn find_overlapping_subnets(subnets: &[Subnet]) -> Vec<(String, String)> {
    subnets
        .iter()
        .tuple_combinations()
        .filter(|(a, b)| do_subnets_overlap(&a.cidr, &b.cidr))
        .map(|(a, b)| (a.name.clone(), b.name.clone()))
        .collect()
}

/// Subnets whose range is not entirely inside `parent`, in plan order.
pub fn find_subnets_outside(parent: Ipv4, subnets: &[Subnet]) -> Vec<&Subnet> {
    subnets
        .iter()
        .filter(|s| match s.block() {
            Ok(block) => !parent.contains_block(&block),
            Err(_) => false,
        })
        .collect()
}

/// Log plan warnings, one line each.
pub fn log_plan_warnings(warnings: &[PlanWarning]) {
    if warnings.is_empty() {
        log::info!("No plan warnings.");
        return;
    }
    log::warn!("Found {} plan warning(s):", warnings.len());
    for warning in warnings {
        log::warn!("  - {warning}");
    }
}
