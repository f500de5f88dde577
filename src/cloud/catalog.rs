//! Sizing recommendations, subnet tiers and availability zone names.

use super::{get_cloud_usable_hosts, CloudUsableHosts, Provider};
use crate::models::get_total_hosts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedSubnet {
    pub name: &'static str,
    pub prefix: u8,
    pub description: &'static str,
    pub use_cases: &'static [&'static str],
    pub total_hosts: u64,
    pub usable_hosts: u64,
}

const WORKLOADS: [(&str, u8, &str, &[&str]); 6] = [
    (
        "Micro Service",
        28,
        "Small workloads, testing environments",
        &["Development", "Testing", "Small services"],
    ),
    (
        "Small Workload",
        27,
        "Small production workloads",
        &["API servers", "Small clusters", "Databases"],
    ),
    (
        "Medium Workload",
        26,
        "Medium production environments",
        &["Web servers", "Application clusters"],
    ),
    (
        "Standard Subnet",
        24,
        "Standard subnet size, good for most workloads",
        &["General purpose", "Kubernetes nodes", "VM clusters"],
    ),
    (
        "Large Workload",
        23,
        "Large production environments",
        &["Large Kubernetes clusters", "Container workloads"],
    ),
    (
        "Extra Large",
        22,
        "Very large deployments",
        &["Multi-AZ deployments", "Large scale services"],
    ),
];

/// Workload sizes the provider accepts, with cloud-aware usable counts.
pub fn get_recommended_subnets(provider: Provider) -> Vec<RecommendedSubnet> {
    let min_prefix = provider.profile().min_subnet_prefix;
    WORKLOADS
        .iter()
        .filter(|(_, prefix, _, _)| *prefix <= min_prefix)
        .map(|&(name, prefix, description, use_cases)| RecommendedSubnet {
            name,
            prefix,
            description,
            use_cases,
            total_hosts: get_total_hosts(prefix),
            usable_hosts: get_cloud_usable_hosts(prefix, provider).usable,
        })
        .collect()
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VpcSizeRecommendation {
    pub prefix: u8,
    pub name: &'static str,
    #[serde(rename = "totalIPs")]
    pub total_ips: u64,
    pub description: &'static str,
    /// Subnet prefix -> how many fit in the VPC.
    pub max_subnets: BTreeMap<u8, u64>,
    pub provider: Provider,
    pub usable_with_cloud_reservations: CloudUsableHosts,
}

const VPC_SIZES: [(u8, &str, &str); 5] = [
    (16, "Large VPC", "Maximum VPC size, suitable for large organizations"),
    (17, "Medium-Large VPC", "Large multi-environment VPC"),
    (18, "Medium VPC", "Standard production VPC"),
    (19, "Small-Medium VPC", "Smaller production or staging VPC"),
    (20, "Small VPC", "Development or small production VPC"),
];

pub fn get_vpc_size_recommendations(provider: Provider) -> Vec<VpcSizeRecommendation> {
    VPC_SIZES
        .iter()
        .map(|&(prefix, name, description)| VpcSizeRecommendation {
            prefix,
            name,
            total_ips: get_total_hosts(prefix),
            description,
            max_subnets: [24u8, 25, 26]
                .into_iter()
                .map(|sub| (sub, 1u64 << (sub - prefix)))
                .collect(),
            provider,
            usable_with_cloud_reservations: get_cloud_usable_hosts(prefix, provider),
        })
        .collect()
}

/// Role of a subnet inside a VPC.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SubnetTier {
    Public,
    Private,
    Database,
    Management,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TierInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub examples: &'static [&'static str],
}

impl SubnetTier {
    pub const ALL: [SubnetTier; 4] = [
        SubnetTier::Public,
        SubnetTier::Private,
        SubnetTier::Database,
        SubnetTier::Management,
    ];

    pub fn id(&self) -> &'static str {
        self.info().id
    }

    pub fn info(&self) -> TierInfo {
        match self {
            SubnetTier::Public => TierInfo {
                id: "public",
                name: "Public",
                description: "Internet-facing resources with public IPs",
                examples: &["Load balancers", "NAT gateways", "Bastion hosts", "Web servers"],
            },
            SubnetTier::Private => TierInfo {
                id: "private",
                name: "Private",
                description: "Internal application workloads",
                examples: &["Application servers", "Kubernetes nodes", "Internal APIs"],
            },
            SubnetTier::Database => TierInfo {
                id: "database",
                name: "Database",
                description: "Data tier with no internet access",
                examples: &["RDS", "DocumentDB", "ElastiCache", "Databases"],
            },
            SubnetTier::Management => TierInfo {
                id: "management",
                name: "Management",
                description: "Operations and monitoring resources",
                examples: &["Monitoring", "Logging", "CI/CD agents"],
            },
        }
    }
}

impl fmt::Display for SubnetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for SubnetTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubnetTier::ALL
            .into_iter()
            .find(|tier| tier.id() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown subnet tier: {s}"))
    }
}

type ZoneTable = &'static [(&'static str, &'static [&'static str])];

const AWS_ZONES: ZoneTable = &[
    (
        "us-east-1",
        &[
            "us-east-1a",
            "us-east-1b",
            "us-east-1c",
            "us-east-1d",
            "us-east-1e",
            "us-east-1f",
        ],
    ),
    ("us-east-2", &["us-east-2a", "us-east-2b", "us-east-2c"]),
    ("us-west-1", &["us-west-1a", "us-west-1b"]),
    ("us-west-2", &["us-west-2a", "us-west-2b", "us-west-2c", "us-west-2d"]),
    ("eu-west-1", &["eu-west-1a", "eu-west-1b", "eu-west-1c"]),
    ("eu-west-2", &["eu-west-2a", "eu-west-2b", "eu-west-2c"]),
    ("eu-central-1", &["eu-central-1a", "eu-central-1b", "eu-central-1c"]),
    ("ap-south-1", &["ap-south-1a", "ap-south-1b", "ap-south-1c"]),
    ("ap-southeast-1", &["ap-southeast-1a", "ap-southeast-1b", "ap-southeast-1c"]),
    ("ap-southeast-2", &["ap-southeast-2a", "ap-southeast-2b", "ap-southeast-2c"]),
    ("ap-northeast-1", &["ap-northeast-1a", "ap-northeast-1c", "ap-northeast-1d"]),
    ("sa-east-1", &["sa-east-1a", "sa-east-1b", "sa-east-1c"]),
];

const AZURE_ZONES: ZoneTable = &[
    ("eastus", &["eastus-1", "eastus-2", "eastus-3"]),
    ("eastus2", &["eastus2-1", "eastus2-2", "eastus2-3"]),
    ("westus", &["westus-1", "westus-2", "westus-3"]),
    ("westus2", &["westus2-1", "westus2-2", "westus2-3"]),
    ("westeurope", &["westeurope-1", "westeurope-2", "westeurope-3"]),
    ("northeurope", &["northeurope-1", "northeurope-2", "northeurope-3"]),
    ("centralindia", &["centralindia-1", "centralindia-2", "centralindia-3"]),
    ("southeastasia", &["southeastasia-1", "southeastasia-2", "southeastasia-3"]),
];

const GCP_ZONES: ZoneTable = &[
    ("us-central1", &["us-central1-a", "us-central1-b", "us-central1-c", "us-central1-f"]),
    ("us-east1", &["us-east1-b", "us-east1-c", "us-east1-d"]),
    ("us-west1", &["us-west1-a", "us-west1-b", "us-west1-c"]),
    ("europe-west1", &["europe-west1-b", "europe-west1-c", "europe-west1-d"]),
    ("europe-west2", &["europe-west2-a", "europe-west2-b", "europe-west2-c"]),
    ("asia-south1", &["asia-south1-a", "asia-south1-b", "asia-south1-c"]),
    ("asia-east1", &["asia-east1-a", "asia-east1-b", "asia-east1-c"]),
    ("asia-southeast1", &["asia-southeast1-a", "asia-southeast1-b", "asia-southeast1-c"]),
];

/// Zone names for a region, generic `<region>-a/b/c` when the region is not
/// in the table.
pub fn get_availability_zones(provider: Provider, region: &str) -> Vec<String> {
    let table = match provider {
        Provider::Traditional => {
            return vec!["zone-1".to_string(), "zone-2".to_string(), "zone-3".to_string()]
        }
        Provider::Aws => AWS_ZONES,
        Provider::Azure => AZURE_ZONES,
        Provider::Gcp => GCP_ZONES,
    };
    match table.iter().find(|(name, _)| *name == region) {
        Some((_, zones)) => zones.iter().map(|z| z.to_string()).collect(),
        None => ["a", "b", "c"]
            .iter()
            .map(|suffix| format!("{region}-{suffix}"))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommended_subnets_respect_minimum() {
        let aws = get_recommended_subnets(Provider::Aws);
        assert_eq!(aws.len(), 6);
        assert_eq!(aws[0].name, "Micro Service");
        assert_eq!(aws[0].usable_hosts, 11);
        assert_eq!(aws[3].usable_hosts, 251);
        for provider in Provider::ALL {
            let min = provider.profile().min_subnet_prefix;
            assert!(get_recommended_subnets(provider).iter().all(|r| r.prefix <= min));
        }
    }

    #[test]
    fn test_vpc_size_recommendations() {
        let sizes = get_vpc_size_recommendations(Provider::Azure);
        assert_eq!(sizes.len(), 5);
        assert_eq!(sizes[0].total_ips, 65536);
        assert_eq!(sizes[0].max_subnets[&24], 256);
        assert_eq!(sizes[4].max_subnets[&26], 64);
        assert_eq!(sizes[0].usable_with_cloud_reservations.usable, 65531);
        let json = serde_json::to_value(&sizes[0]).unwrap();
        assert_eq!(json["totalIPs"], 65536);
        assert_eq!(json["maxSubnets"]["25"], 512);
    }

    #[test]
    fn test_subnet_tier_ids() {
        assert_eq!("database".parse::<SubnetTier>(), Ok(SubnetTier::Database));
        assert!("dmz".parse::<SubnetTier>().is_err());
        assert_eq!(SubnetTier::Management.info().name, "Management");
        assert_eq!(serde_json::to_string(&SubnetTier::Public).unwrap(), "\"public\"");
    }

    #[test]
    fn test_availability_zones() {
        assert_eq!(
            get_availability_zones(Provider::Aws, "us-west-1"),
            vec!["us-west-1a", "us-west-1b"]
        );
        assert_eq!(
            get_availability_zones(Provider::Gcp, "mars-north1"),
            vec!["mars-north1-a", "mars-north1-b", "mars-north1-c"]
        );
        assert_eq!(
            get_availability_zones(Provider::Traditional, "anything"),
            vec!["zone-1", "zone-2", "zone-3"]
        );
    }
}
