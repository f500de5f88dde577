//! DHCP server configuration renderers.
//!
//! Each dialect is a deterministic text rendering of a [`DhcpServerConfig`].
//! Option payloads come from the [`crate::dhcp`] codec.

use crate::dhcp::{bytes_to_hex, encode_option_119, encode_option_121, Route};
use crate::models::parse_ipv4;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

const HEADER: &str = "Generated by Subnet Zero - DHCP Option Builder";

/// Encoded or structured values for the three codec-backed options.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DhcpOptions {
    pub option43: Vec<u8>,
    pub option121: Vec<Route>,
    pub option119: Vec<String>,
}

/// Resolved scope to render. Empty strings and `None` mean "not set".
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DhcpServerConfig {
    pub subnet: String,
    pub netmask: String,
    pub range_start: String,
    pub range_end: String,
    pub gateway: String,
    pub dns: Vec<String>,
    pub domain: String,
    pub lease_time: Option<u32>,
    pub scope_name: String,
    pub pool_name: String,
    pub options: DhcpOptions,
}

impl Default for DhcpServerConfig {
    fn default() -> Self {
        DhcpServerConfig {
            subnet: "10.0.1.0".to_string(),
            netmask: "255.255.255.0".to_string(),
            range_start: "10.0.1.20".to_string(),
            range_end: "10.0.1.250".to_string(),
            gateway: "10.0.1.1".to_string(),
            dns: vec![],
            domain: "".to_string(),
            lease_time: Some(28800),
            scope_name: "Scope1".to_string(),
            pool_name: "POOL1".to_string(),
            options: DhcpOptions::default(),
        }
    }
}

impl DhcpServerConfig {
    /// A /24 scope around `gateway` with the pool at `.20`-`.250`.
    pub fn for_gateway(gateway: Ipv4Addr) -> DhcpServerConfig {
        let [a, b, c, _] = gateway.octets();
        DhcpServerConfig {
            subnet: Ipv4Addr::new(a, b, c, 0).to_string(),
            range_start: Ipv4Addr::new(a, b, c, 20).to_string(),
            range_end: Ipv4Addr::new(a, b, c, 250).to_string(),
            gateway: gateway.to_string(),
            ..Default::default()
        }
    }

    fn has_range(&self) -> bool {
        !self.range_start.is_empty() && !self.range_end.is_empty()
    }

    fn prefix(&self) -> u32 {
        parse_ipv4(&self.netmask)
            .map(|mask| u32::from(mask).count_ones())
            .unwrap_or(0)
    }

    fn scope_name(&self) -> &str {
        if self.scope_name.is_empty() {
            "Scope1"
        } else {
            &self.scope_name
        }
    }

    fn pool_name(&self) -> &str {
        if self.pool_name.is_empty() {
            "POOL1"
        } else {
            &self.pool_name
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerTypeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub extension: &'static str,
    pub description: &'static str,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ServerType {
    #[default]
    IscDhcp,
    KeaDhcp,
    Dnsmasq,
    WindowsDhcp,
    CiscoIos,
    RawHex,
}

impl ServerType {
    pub const ALL: [ServerType; 6] = [
        ServerType::IscDhcp,
        ServerType::KeaDhcp,
        ServerType::Dnsmasq,
        ServerType::WindowsDhcp,
        ServerType::CiscoIos,
        ServerType::RawHex,
    ];

    pub fn info(&self) -> ServerTypeInfo {
        let (id, name, extension, description) = match self {
            ServerType::IscDhcp => ("iscDhcp", "ISC DHCP", ".conf", "ISC DHCP Server (dhcpd.conf)"),
            ServerType::KeaDhcp => ("keaDhcp", "Kea DHCP", ".json", "ISC Kea DHCP (JSON)"),
            ServerType::Dnsmasq => ("dnsmasq", "dnsmasq", ".conf", "dnsmasq configuration"),
            ServerType::WindowsDhcp => (
                "windowsDhcp",
                "Windows DHCP",
                ".ps1",
                "Windows Server DHCP (PowerShell)",
            ),
            ServerType::CiscoIos => ("ciscoIos", "Cisco IOS", ".txt", "Cisco IOS DHCP pool"),
            ServerType::RawHex => ("rawHex", "Raw Hex", ".txt", "Raw hex values for any system"),
        };
        ServerTypeInfo {
            id,
            name,
            extension,
            description,
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info().id)
    }
}

impl FromStr for ServerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServerType::ALL
            .into_iter()
            .find(|t| t.info().id.eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown DHCP server type: {s}"))
    }
}

/// Render `config` in the dialect of `server`.
pub fn generate_dhcp_config(server: ServerType, config: &DhcpServerConfig) -> String {
    log::debug!("generate_dhcp_config {server} subnet={}", config.subnet);
    match server {
        ServerType::IscDhcp => generate_isc_dhcp(config),
        ServerType::KeaDhcp => generate_kea_dhcp(config),
        ServerType::Dnsmasq => generate_dnsmasq(config),
        ServerType::WindowsDhcp => generate_windows_dhcp(config),
        ServerType::CiscoIos => generate_cisco_ios(config),
        ServerType::RawHex => generate_raw_hex(config),
    }
}

pub fn generate_isc_dhcp(config: &DhcpServerConfig) -> String {
    let mut lines = vec![
        format!("# {HEADER}"),
        "# ISC DHCP Server Configuration".to_string(),
        "".to_string(),
        format!("subnet {} netmask {} {{", config.subnet, config.netmask),
    ];
    if config.has_range() {
        lines.push(format!("    range {} {};", config.range_start, config.range_end));
    }
    if !config.gateway.is_empty() {
        lines.push(format!("    option routers {};", config.gateway));
    }
    if !config.dns.is_empty() {
        lines.push(format!("    option domain-name-servers {};", config.dns.join(", ")));
    }
    if !config.domain.is_empty() {
        lines.push(format!("    option domain-name \"{}\";", config.domain));
    }
    if let Some(lease) = config.lease_time.filter(|l| *l > 0) {
        lines.push(format!("    default-lease-time {lease};"));
        lines.push(format!("    max-lease-time {};", u64::from(lease) * 3 / 2));
    }

    let options = &config.options;
    if !options.option43.is_empty() {
        lines.push("".to_string());
        lines.push("    # Option 43 - Vendor Specific".to_string());
        lines.push(format!(
            "    option vendor-encapsulated-options {};",
            bytes_to_hex(&options.option43, ":")
        ));
    }
    if !options.option121.is_empty() {
        lines.push("".to_string());
        lines.push("    # Option 121 - Classless Static Routes".to_string());
        lines.push(format!(
            "    option rfc3442-classless-static-routes {};",
            bytes_to_hex(&encode_option_121(&options.option121), ":")
        ));
    }
    if !options.option119.is_empty() {
        lines.push("".to_string());
        lines.push("    # Option 119 - Domain Search List".to_string());
        lines.push(format!(
            "    option domain-search {};",
            bytes_to_hex(&encode_option_119(&options.option119), ":")
        ));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

/// Kea `Dhcp4` JSON, two-space indented.
pub fn generate_kea_dhcp(config: &DhcpServerConfig) -> String {
    let mut option_data = vec![];
    if !config.gateway.is_empty() {
        option_data.push(json!({ "name": "routers", "data": config.gateway }));
    }
    if !config.dns.is_empty() {
        option_data.push(json!({ "name": "domain-name-servers", "data": config.dns.join(", ") }));
    }
    if !config.domain.is_empty() {
        option_data.push(json!({ "name": "domain-name", "data": config.domain }));
    }
    if !config.options.option43.is_empty() {
        option_data.push(json!({ "code": 43, "data": bytes_to_hex(&config.options.option43, "") }));
    }

    let pools = if config.has_range() {
        vec![json!({ "pool": format!("{} - {}", config.range_start, config.range_end) })]
    } else {
        vec![]
    };
    let mut subnet = json!({
        "subnet": format!("{}/{}", config.subnet, config.prefix()),
        "pools": pools,
        "option-data": option_data,
    });
    if let Some(lease) = config.lease_time.filter(|l| *l > 0) {
        subnet["valid-lifetime"] = json!(lease);
    }

    let kea = json!({ "Dhcp4": { "subnet4": [subnet] } });
    serde_json::to_string_pretty(&kea).unwrap_or_default()
}

pub fn generate_dnsmasq(config: &DhcpServerConfig) -> String {
    let mut lines = vec![
        format!("# {HEADER}"),
        "# dnsmasq Configuration".to_string(),
        "".to_string(),
    ];
    if config.has_range() {
        let lease = match config.lease_time.filter(|l| *l > 0) {
            Some(seconds) => format!("{}h", seconds / 3600),
            None => "12h".to_string(),
        };
        lines.push(format!(
            "dhcp-range={},{},{},{lease}",
            config.range_start, config.range_end, config.netmask
        ));
    }
    if !config.gateway.is_empty() {
        lines.push(format!("dhcp-option=3,{}", config.gateway));
    }
    if !config.dns.is_empty() {
        lines.push(format!("dhcp-option=6,{}", config.dns.join(",")));
    }
    if !config.domain.is_empty() {
        lines.push(format!("dhcp-option=15,{}", config.domain));
    }
    if !config.options.option43.is_empty() {
        lines.push(format!("dhcp-option=43,{}", bytes_to_hex(&config.options.option43, ":")));
    }
    for route in &config.options.option121 {
        if let Some((dest, prefix)) = route.target() {
            lines.push(format!("dhcp-option=121,{dest}/{prefix},{}", route.gateway));
        }
    }
    lines.join("\n")
}

pub fn generate_windows_dhcp(config: &DhcpServerConfig) -> String {
    let scope = &config.subnet;
    let mut lines = vec![
        format!("# {HEADER}"),
        "# Windows Server DHCP Configuration (PowerShell)".to_string(),
        "".to_string(),
        "# Create DHCP Scope".to_string(),
        format!(
            "Add-DhcpServerv4Scope -Name \"{}\" -StartRange {} -EndRange {} -SubnetMask {}",
            config.scope_name(),
            config.range_start,
            config.range_end,
            config.netmask
        ),
        "".to_string(),
    ];
    if !config.gateway.is_empty() {
        lines.push("# Set Default Gateway".to_string());
        lines.push(format!(
            "Set-DhcpServerv4OptionValue -ScopeId {scope} -Router {}",
            config.gateway
        ));
    }
    if !config.dns.is_empty() {
        lines.push("# Set DNS Servers".to_string());
        lines.push(format!(
            "Set-DhcpServerv4OptionValue -ScopeId {scope} -DnsServer {}",
            config.dns.join(",")
        ));
    }
    if !config.domain.is_empty() {
        lines.push("# Set Domain Name".to_string());
        lines.push(format!(
            "Set-DhcpServerv4OptionValue -ScopeId {scope} -DnsDomain \"{}\"",
            config.domain
        ));
    }
    if let Some(lease) = config.lease_time.filter(|l| *l > 0) {
        lines.push("# Set Lease Duration".to_string());
        lines.push(format!(
            "Set-DhcpServerv4Scope -ScopeId {scope} -LeaseDuration {}.{}:00:00",
            lease / 86400,
            (lease % 86400) / 3600
        ));
    }
    if !config.options.option43.is_empty() {
        lines.push("# Option 43 - Vendor Specific".to_string());
        lines.push(format!(
            "Set-DhcpServerv4OptionValue -ScopeId {scope} -OptionId 43 -Value ([byte[]]@({}))",
            config.options.option43.iter().join(",")
        ));
    }
    lines.join("\n")
}

pub fn generate_cisco_ios(config: &DhcpServerConfig) -> String {
    let mut lines = vec![
        format!("! {HEADER}"),
        "! Cisco IOS DHCP Pool Configuration".to_string(),
        "".to_string(),
        format!("ip dhcp pool {}", config.pool_name()),
        format!("   network {} {}", config.subnet, config.netmask),
    ];
    if !config.gateway.is_empty() {
        lines.push(format!("   default-router {}", config.gateway));
    }
    if !config.dns.is_empty() {
        lines.push(format!("   dns-server {}", config.dns.join(" ")));
    }
    if !config.domain.is_empty() {
        lines.push(format!("   domain-name {}", config.domain));
    }
    if let Some(lease) = config.lease_time.filter(|l| *l > 0) {
        lines.push(format!("   lease {} {}", lease / 86400, (lease % 86400) / 3600));
    }
    if !config.options.option43.is_empty() {
        lines.push(format!("   option 43 hex {}", bytes_to_hex(&config.options.option43, ".")));
    }
    if config.has_range() {
        // addresses below the pool start stay out of the pool
        match parse_ipv4(&config.range_start) {
            Ok(start) => {
                let before = Ipv4Addr::from(u32::from(start).saturating_sub(1));
                lines.push("!".to_string());
                lines.push(format!("ip dhcp excluded-address {} {before}", config.subnet));
            }
            Err(e) => log::warn!("No excluded-address line: {e}"),
        }
    }
    lines.join("\n")
}

fn raw_hex_section(lines: &mut Vec<String>, title: &str, bytes: &[u8]) {
    lines.push(format!("{title}:"));
    lines.push(format!("  Hex: {}", bytes_to_hex(bytes, ":")));
    lines.push(format!("  Bytes: {}", bytes.iter().join(", ")));
    lines.push("".to_string());
}

pub fn generate_raw_hex(config: &DhcpServerConfig) -> String {
    let mut lines = vec![
        format!("# {HEADER}"),
        "# Raw Hex Values".to_string(),
        "".to_string(),
    ];
    let options = &config.options;
    if !options.option43.is_empty() {
        raw_hex_section(&mut lines, "Option 43 (Vendor Specific)", &options.option43);
    }
    if !options.option121.is_empty() {
        let encoded = encode_option_121(&options.option121);
        raw_hex_section(&mut lines, "Option 121 (Classless Static Routes)", &encoded);
    }
    if !options.option119.is_empty() {
        let encoded = encode_option_119(&options.option119);
        raw_hex_section(&mut lines, "Option 119 (Domain Search List)", &encoded);
    }
    lines.join("\n")
}
