//! Infrastructure-as-code renderers for a [`VpcPlan`].
//!
//! - Terraform HCL for AWS, Azure and GCP
//! - CloudFormation JSON (AWS only)

use crate::cloud::{Provider, SubnetTier};
use crate::models::{Ipv4, Subnet, VpcPlan};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum IacFormat {
    #[default]
    Terraform,
    CloudformationJson,
}

impl IacFormat {
    pub const ALL: [IacFormat; 2] = [IacFormat::Terraform, IacFormat::CloudformationJson];

    pub fn id(&self) -> &'static str {
        match self {
            IacFormat::Terraform => "terraform",
            IacFormat::CloudformationJson => "cloudformationJson",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            IacFormat::Terraform => ".tf",
            IacFormat::CloudformationJson => ".json",
        }
    }
}

impl fmt::Display for IacFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for IacFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IacFormat::ALL
            .into_iter()
            .find(|f| f.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown IaC format: {s}"))
    }
}

/// Default region and zone used when exporting a single calculated block.
fn default_location(provider: Provider) -> (&'static str, &'static str) {
    match provider {
        Provider::Azure => ("eastus", "eastus"),
        Provider::Gcp => ("us-central1", "us-central1-a"),
        Provider::Aws | Provider::Traditional => ("us-east-1", "us-east-1a"),
    }
}

/// Wrap one calculated block into a plan: a private `subnet-1` inside a VPC
/// eight bits shorter (never shorter than /8).
pub fn plan_for_block(block: Ipv4, provider: Provider) -> VpcPlan {
    let (region, az) = default_location(provider);
    let network = block.network();
    let vpc_prefix = network.mask.saturating_sub(8).max(8);
    let vpc = Ipv4 {
        addr: network.addr,
        mask: vpc_prefix.min(network.mask),
    }
    .network();

    let mut plan = VpcPlan::new("main-vpc", &vpc.to_string(), provider, region);
    plan.add_subnet(Subnet::new("subnet-1", &network.to_string(), SubnetTier::Private, az));
    plan
}

/// `[a-z0-9_]` identifier, unique within `seen`.
fn unique_identifier(name: &str, seen: &mut HashSet<String>) -> String {
    let mut base: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if base.is_empty() || base.starts_with(|c: char| c.is_ascii_digit()) {
        base = format!("r_{base}");
    }
    let mut candidate = base.clone();
    let mut n = 2;
    while !seen.insert(candidate.clone()) {
        candidate = format!("{base}_{n}");
        n += 1;
    }
    candidate
}

/// PascalCase CloudFormation logical id, unique within `seen`.
fn logical_id(name: &str, seen: &mut HashSet<String>) -> String {
    let mut base: String = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    if base.is_empty() || base.starts_with(|c: char| c.is_ascii_digit()) {
        base = format!("Subnet{base}");
    }
    let mut candidate = base.clone();
    let mut n = 2;
    while !seen.insert(candidate.clone()) {
        candidate = format!("{base}{n}");
        n += 1;
    }
    candidate
}

pub fn generate_iac(format: IacFormat, plan: &VpcPlan) -> String {
    log::debug!("generate_iac {format} provider={} subnets={}", plan.provider, plan.subnets.len());
    match format {
        IacFormat::Terraform => generate_terraform(plan),
        IacFormat::CloudformationJson => generate_cloudformation_json(plan),
    }
}

/// Terraform for the plan's provider. `traditional` renders as AWS.
pub fn generate_terraform(plan: &VpcPlan) -> String {
    match plan.provider {
        Provider::Azure => generate_azure_terraform(plan),
        Provider::Gcp => generate_gcp_terraform(plan),
        Provider::Aws | Provider::Traditional => generate_aws_terraform(plan),
    }
}

fn terraform_header(plan: &VpcPlan, provider_name: &str, source: &str) -> Vec<String> {
    vec![
        "# Generated by Subnet Zero - VPC Planner".to_string(),
        format!("# {} subnet(s) in {}", plan.subnets.len(), plan.cidr),
        "".to_string(),
        "terraform {".to_string(),
        "  required_providers {".to_string(),
        format!("    {provider_name} = {{"),
        format!("      source = \"{source}\""),
        "    }".to_string(),
        "  }".to_string(),
        "}".to_string(),
        "".to_string(),
    ]
}

pub fn generate_aws_terraform(plan: &VpcPlan) -> String {
    let mut seen = HashSet::new();
    let vpc_id = unique_identifier(&plan.name, &mut seen);
    let mut lines = terraform_header(plan, "aws", "hashicorp/aws");
    lines.extend([
        "provider \"aws\" {".to_string(),
        format!("  region = \"{}\"", plan.region),
        "}".to_string(),
        "".to_string(),
        format!("resource \"aws_vpc\" \"{vpc_id}\" {{"),
        format!("  cidr_block           = \"{}\"", plan.cidr),
        "  enable_dns_hostnames = true".to_string(),
        "  enable_dns_support   = true".to_string(),
        "".to_string(),
        "  tags = {".to_string(),
        format!("    Name = \"{}\"", plan.name),
        "  }".to_string(),
        "}".to_string(),
    ]);

    for subnet in &plan.subnets {
        let id = unique_identifier(&subnet.name, &mut seen);
        lines.push("".to_string());
        lines.push(format!("resource \"aws_subnet\" \"{id}\" {{"));
        lines.push(format!("  vpc_id            = aws_vpc.{vpc_id}.id"));
        lines.push(format!("  cidr_block        = \"{}\"", subnet.cidr));
        if !subnet.az.is_empty() {
            lines.push(format!("  availability_zone = \"{}\"", subnet.az));
        }
        if subnet.tier == SubnetTier::Public {
            lines.push("  map_public_ip_on_launch = true".to_string());
        }
        lines.push("".to_string());
        lines.push("  tags = {".to_string());
        lines.push(format!("    Name = \"{}\"", subnet.name));
        lines.push(format!("    Tier = \"{}\"", subnet.tier));
        lines.push("  }".to_string());
        lines.push("}".to_string());
    }
    lines.join("\n")
}

pub fn generate_azure_terraform(plan: &VpcPlan) -> String {
    let mut seen = HashSet::new();
    let vnet_id = unique_identifier(&plan.name, &mut seen);
    seen.insert("main".to_string());
    let mut lines = terraform_header(plan, "azurerm", "hashicorp/azurerm");
    lines.extend([
        "provider \"azurerm\" {".to_string(),
        "  features {}".to_string(),
        "}".to_string(),
        "".to_string(),
        "resource \"azurerm_resource_group\" \"main\" {".to_string(),
        format!("  name     = \"{}-rg\"", plan.name),
        format!("  location = \"{}\"", plan.region),
        "}".to_string(),
        "".to_string(),
        format!("resource \"azurerm_virtual_network\" \"{vnet_id}\" {{"),
        format!("  name                = \"{}\"", plan.name),
        format!("  address_space       = [\"{}\"]", plan.cidr),
        "  location            = azurerm_resource_group.main.location".to_string(),
        "  resource_group_name = azurerm_resource_group.main.name".to_string(),
        "}".to_string(),
    ]);

    for subnet in &plan.subnets {
        let id = unique_identifier(&subnet.name, &mut seen);
        lines.push("".to_string());
        lines.push(format!("resource \"azurerm_subnet\" \"{id}\" {{"));
        lines.push(format!("  name                 = \"{}\"", subnet.name));
        lines.push("  resource_group_name  = azurerm_resource_group.main.name".to_string());
        lines.push(format!("  virtual_network_name = azurerm_virtual_network.{vnet_id}.name"));
        lines.push(format!("  address_prefixes     = [\"{}\"]", subnet.cidr));
        lines.push("}".to_string());
    }
    lines.join("\n")
}

pub fn generate_gcp_terraform(plan: &VpcPlan) -> String {
    let mut seen = HashSet::new();
    let network_id = unique_identifier(&plan.name, &mut seen);
    let mut lines = terraform_header(plan, "google", "hashicorp/google");
    lines.extend([
        "provider \"google\" {".to_string(),
        format!("  region = \"{}\"", plan.region),
        "}".to_string(),
        "".to_string(),
        format!("resource \"google_compute_network\" \"{network_id}\" {{"),
        format!("  name                    = \"{}\"", plan.name),
        "  auto_create_subnetworks = false".to_string(),
        "}".to_string(),
    ]);

    for subnet in &plan.subnets {
        let id = unique_identifier(&subnet.name, &mut seen);
        lines.push("".to_string());
        lines.push(format!("resource \"google_compute_subnetwork\" \"{id}\" {{"));
        lines.push(format!("  name          = \"{}\"", subnet.name));
        lines.push(format!("  ip_cidr_range = \"{}\"", subnet.cidr));
        lines.push(format!("  region        = \"{}\"", plan.region));
        lines.push(format!("  network       = google_compute_network.{network_id}.id"));
        if subnet.tier != SubnetTier::Public {
            lines.push("  private_ip_google_access = true".to_string());
        }
        lines.push("}".to_string());
    }
    lines.join("\n")
}

fn name_tags(name: &str, tier: Option<SubnetTier>) -> Value {
    let mut tags = vec![json!({ "Key": "Name", "Value": name })];
    if let Some(tier) = tier {
        tags.push(json!({ "Key": "Tier", "Value": tier.id() }));
    }
    Value::Array(tags)
}

pub fn generate_cloudformation_json(plan: &VpcPlan) -> String {
    let mut seen = HashSet::from(["VPC".to_string()]);
    let mut resources = Map::new();
    resources.insert(
        "VPC".to_string(),
        json!({
            "Type": "AWS::EC2::VPC",
            "Properties": {
                "CidrBlock": plan.cidr,
                "EnableDnsSupport": true,
                "EnableDnsHostnames": true,
                "Tags": name_tags(&plan.name, None),
            }
        }),
    );

    let mut outputs = Map::new();
    outputs.insert("VpcId".to_string(), json!({ "Value": { "Ref": "VPC" } }));

    for subnet in &plan.subnets {
        let id = logical_id(&subnet.name, &mut seen);
        let mut properties = Map::new();
        properties.insert("VpcId".to_string(), json!({ "Ref": "VPC" }));
        properties.insert("CidrBlock".to_string(), json!(subnet.cidr));
        if !subnet.az.is_empty() {
            properties.insert("AvailabilityZone".to_string(), json!(subnet.az));
        }
        if subnet.tier == SubnetTier::Public {
            properties.insert("MapPublicIpOnLaunch".to_string(), json!(true));
        }
        properties.insert("Tags".to_string(), name_tags(&subnet.name, Some(subnet.tier)));
        resources.insert(
            id.clone(),
            json!({ "Type": "AWS::EC2::Subnet", "Properties": properties }),
        );
        outputs.insert(format!("{id}Id"), json!({ "Value": { "Ref": id } }));
    }

    let template = json!({
        "AWSTemplateFormatVersion": "2010-09-09",
        "Description": format!("{} - generated by Subnet Zero", plan.name),
        "Resources": resources,
        "Outputs": outputs,
    });
    serde_json::to_string_pretty(&template).unwrap_or_default()
}
