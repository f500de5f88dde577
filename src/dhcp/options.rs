//! Standard DHCP option table and typed value encoding.

use super::domain119::encode_option_119;
use super::hex::ip_to_bytes;
use super::route121::{encode_option_121, Route};
use super::tlv::encode_tlv;
use crate::error::DhcpError;
use serde::{Deserialize, Serialize};

/// Value shape an option code carries.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKind {
    Ip,
    IpList,
    String,
    Uint32,
    Vendor,
    DomainList,
    Routes,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StandardOption {
    pub code: u8,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub description: &'static str,
}

const fn option(
    code: u8,
    name: &'static str,
    kind: OptionKind,
    description: &'static str,
) -> StandardOption {
    StandardOption {
        code,
        name,
        kind,
        description,
    }
}

pub const STANDARD_OPTIONS: [StandardOption; 11] = [
    option(1, "Subnet Mask", OptionKind::Ip, "Subnet mask for the network"),
    option(3, "Router/Gateway", OptionKind::IpList, "Default gateway(s)"),
    option(6, "DNS Servers", OptionKind::IpList, "Domain name servers"),
    option(15, "Domain Name", OptionKind::String, "Domain name for client"),
    option(42, "NTP Servers", OptionKind::IpList, "Network time protocol servers"),
    option(43, "Vendor Specific", OptionKind::Vendor, "Vendor-specific options"),
    option(51, "Lease Time", OptionKind::Uint32, "IP address lease time in seconds"),
    option(66, "TFTP Server", OptionKind::String, "TFTP server name (PXE boot)"),
    option(67, "Boot Filename", OptionKind::String, "Boot file name (PXE boot)"),
    option(119, "Domain Search", OptionKind::DomainList, "Domain search list"),
    option(121, "Classless Routes", OptionKind::Routes, "Classless static routes (RFC 3442)"),
];

pub fn standard_option(code: u8) -> Option<&'static StandardOption> {
    STANDARD_OPTIONS.iter().find(|o| o.code == code)
}

/// A typed option value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum OptionValue {
    Ip(String),
    IpList(Vec<String>),
    String(String),
    Uint32(u32),
    DomainList(Vec<String>),
    Routes(Vec<Route>),
    /// Already encoded bytes, used for Option 43.
    Vendor(Vec<u8>),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Ip(_) => OptionKind::Ip,
            OptionValue::IpList(_) => OptionKind::IpList,
            OptionValue::String(_) => OptionKind::String,
            OptionValue::Uint32(_) => OptionKind::Uint32,
            OptionValue::DomainList(_) => OptionKind::DomainList,
            OptionValue::Routes(_) => OptionKind::Routes,
            OptionValue::Vendor(_) => OptionKind::Vendor,
        }
    }
}

/// Option payload without the code and length. Invalid addresses are left
/// out of the payload.
pub fn encode_option_value(value: &OptionValue) -> Vec<u8> {
    match value {
        OptionValue::Ip(ip) => ip_to_bytes(ip).map(|b| b.to_vec()).unwrap_or_default(),
        OptionValue::IpList(ips) => ips.iter().filter_map(|ip| ip_to_bytes(ip)).flatten().collect(),
        OptionValue::String(text) => text.as_bytes().to_vec(),
        OptionValue::Uint32(n) => n.to_be_bytes().to_vec(),
        OptionValue::DomainList(domains) => encode_option_119(domains),
        OptionValue::Routes(routes) => encode_option_121(routes),
        OptionValue::Vendor(bytes) => bytes.clone(),
    }
}

/// Full `[code, len, payload...]` option.
pub fn encode_option(code: u8, value: &OptionValue) -> Result<Vec<u8>, DhcpError> {
    if let Some(known) = standard_option(code) {
        if known.kind != value.kind() {
            log::warn!(
                "Option {code} ({}) expects {:?}, got {:?}",
                known.name,
                known.kind,
                value.kind()
            );
        }
    }
    encode_tlv(code, &encode_option_value(value))
}
