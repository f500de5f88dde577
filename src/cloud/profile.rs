//! Static reservation tables, one per provider.

use super::Provider;
use serde::{Serialize, Serializer};

/// Where a reserved address sits inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedOffset {
    /// Fixed offset from the network address.
    Offset(u32),
    /// Last address of the block.
    Broadcast,
    /// One before the broadcast address.
    SecondToLast,
}

impl ReservedOffset {
    /// Concrete offset for a block of `total` addresses, `None` when it falls
    /// outside the block.
    pub fn resolve(&self, total: u64) -> Option<u64> {
        let offset = match self {
            ReservedOffset::Offset(n) => u64::from(*n),
            ReservedOffset::Broadcast => total.checked_sub(1)?,
            ReservedOffset::SecondToLast => total.checked_sub(2)?,
        };
        (offset < total).then_some(offset)
    }

    pub fn is_end_anchored(&self) -> bool {
        !matches!(self, ReservedOffset::Offset(_))
    }
}

impl Serialize for ReservedOffset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReservedOffset::Offset(n) => serializer.serialize_u32(*n),
            ReservedOffset::Broadcast => serializer.serialize_str("broadcast"),
            ReservedOffset::SecondToLast => serializer.serialize_str("second-to-last"),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub offset: ReservedOffset,
    pub name: &'static str,
    pub description: &'static str,
}

/// Reservation policy and size limits of one provider.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    pub reserved_count: u8,
    pub reserved_ips: &'static [Reservation],
    /// Longest prefix (smallest block) the provider accepts for a subnet.
    pub min_subnet_prefix: u8,
    /// Shortest prefix (largest block) the provider accepts.
    pub max_subnet_prefix: u8,
    pub vpc_min_prefix: Option<u8>,
    pub vpc_max_prefix: Option<u8>,
    pub documentation: Option<&'static str>,
    pub notes: &'static [&'static str],
}

impl ProviderProfile {
    /// Numeric offsets must run 0, 1, 2 ... without holes for the first
    /// usable address formula to hold.
    pub fn low_offsets_contiguous(&self) -> bool {
        self.reserved_ips
            .iter()
            .filter_map(|r| match r.offset {
                ReservedOffset::Offset(n) => Some(n),
                _ => None,
            })
            .enumerate()
            .all(|(i, n)| n as usize == i)
    }
}

const NETWORK: Reservation = Reservation {
    offset: ReservedOffset::Offset(0),
    name: "Network Address",
    description: "Base network address",
};

const BROADCAST: Reservation = Reservation {
    offset: ReservedOffset::Broadcast,
    name: "Broadcast",
    description: "Network broadcast address",
};

static AWS: ProviderProfile = ProviderProfile {
    id: "aws",
    name: "Amazon Web Services",
    short_name: "AWS",
    reserved_count: 5,
    reserved_ips: &[
        NETWORK,
        Reservation {
            offset: ReservedOffset::Offset(1),
            name: "VPC Router",
            description: "Reserved by AWS for the VPC router",
        },
        Reservation {
            offset: ReservedOffset::Offset(2),
            name: "DNS Server",
            description: "Reserved for Amazon-provided DNS",
        },
        Reservation {
            offset: ReservedOffset::Offset(3),
            name: "Future Use",
            description: "Reserved by AWS for future use",
        },
        BROADCAST,
    ],
    min_subnet_prefix: 28,
    max_subnet_prefix: 16,
    vpc_min_prefix: Some(28),
    vpc_max_prefix: Some(16),
    documentation: Some("https://docs.aws.amazon.com/vpc/latest/userguide/subnet-sizing.html"),
    notes: &[
        "AWS reserves 5 IPs in every subnet",
        "Minimum subnet size is /28 (16 IPs, 11 usable)",
        "Maximum VPC size is /16",
        "First 4 and last 1 IP are reserved",
    ],
};

static AZURE: ProviderProfile = ProviderProfile {
    id: "azure",
    name: "Microsoft Azure",
    short_name: "Azure",
    reserved_count: 5,
    reserved_ips: &[
        NETWORK,
        Reservation {
            offset: ReservedOffset::Offset(1),
            name: "Default Gateway",
            description: "Reserved for default gateway",
        },
        Reservation {
            offset: ReservedOffset::Offset(2),
            name: "Azure DNS",
            description: "Azure DNS mapping IP",
        },
        Reservation {
            offset: ReservedOffset::Offset(3),
            name: "Azure DNS",
            description: "Additional Azure DNS IP",
        },
        BROADCAST,
    ],
    min_subnet_prefix: 29,
    max_subnet_prefix: 8,
    vpc_min_prefix: Some(29),
    vpc_max_prefix: Some(8),
    documentation: Some(
        "https://docs.microsoft.com/en-us/azure/virtual-network/virtual-networks-faq",
    ),
    notes: &[
        "Azure reserves 5 IPs in every subnet",
        "Minimum subnet size is /29 (8 IPs, 3 usable)",
        "First 4 and last 1 IP are reserved",
        "Some services require larger subnets",
    ],
};

static GCP: ProviderProfile = ProviderProfile {
    id: "gcp",
    name: "Google Cloud Platform",
    short_name: "GCP",
    reserved_count: 4,
    reserved_ips: &[
        NETWORK,
        Reservation {
            offset: ReservedOffset::Offset(1),
            name: "Default Gateway",
            description: "Reserved for subnet gateway",
        },
        Reservation {
            offset: ReservedOffset::SecondToLast,
            name: "Reserved",
            description: "Reserved by GCP",
        },
        BROADCAST,
    ],
    min_subnet_prefix: 29,
    max_subnet_prefix: 8,
    vpc_min_prefix: Some(29),
    vpc_max_prefix: Some(8),
    documentation: Some("https://cloud.google.com/vpc/docs/subnets"),
    notes: &[
        "GCP reserves 4 IPs in every subnet",
        "Network, gateway, second-to-last, and broadcast",
        "Minimum subnet size is /29 (8 IPs, 4 usable)",
        "Subnets are regional, not zonal",
    ],
};

static TRADITIONAL: ProviderProfile = ProviderProfile {
    id: "traditional",
    name: "Traditional/On-Premises",
    short_name: "Traditional",
    reserved_count: 2,
    reserved_ips: &[NETWORK, BROADCAST],
    min_subnet_prefix: 30,
    max_subnet_prefix: 8,
    vpc_min_prefix: None,
    vpc_max_prefix: None,
    documentation: None,
    notes: &[
        "Traditional networking reserves only network and broadcast addresses",
        "/31 subnets (point-to-point) can use both IPs (RFC 3021)",
        "/32 is a single host route",
    ],
};

pub(super) fn profile_for(provider: Provider) -> &'static ProviderProfile {
    match provider {
        Provider::Aws => &AWS,
        Provider::Azure => &AZURE,
        Provider::Gcp => &GCP,
        Provider::Traditional => &TRADITIONAL,
    }
}
