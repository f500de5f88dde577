//! Option 43 vendor templates.
//!
//! Each template turns a [`VendorConfig`] into a flat run of sub-TLVs in the
//! vendor's fixed order. Entries that cannot be encoded are skipped.

use super::hex::ip_to_bytes;
use super::tlv::{encode_tlv, Tlv};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Input field a template reads from [`VendorConfig`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VendorField {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub required: bool,
    pub placeholder: Option<&'static str>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VendorInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub sub_option_type: Option<u8>,
    pub fields: &'static [VendorField],
}

/// Everything any template may need. Fields a template does not use are
/// ignored.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct VendorConfig {
    #[serde(rename = "controllerIPs")]
    pub controller_ips: Vec<String>,
    pub controller_url: String,
    pub provisioning_url: String,
    pub entries: Vec<Tlv>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VendorTemplate {
    #[serde(rename = "ciscoWLC")]
    CiscoWlc,
    ArubaController,
    UbiquitiUnifi,
    Meraki,
    PolycomPhones,
    Custom,
}

const CONTROLLER_IPS: &[VendorField] = &[VendorField {
    id: "controllerIPs",
    name: "Controller IPs",
    kind: "ip-list",
    required: true,
    placeholder: None,
}];

impl VendorTemplate {
    pub const ALL: [VendorTemplate; 6] = [
        VendorTemplate::CiscoWlc,
        VendorTemplate::ArubaController,
        VendorTemplate::UbiquitiUnifi,
        VendorTemplate::Meraki,
        VendorTemplate::PolycomPhones,
        VendorTemplate::Custom,
    ];

    pub fn info(&self) -> VendorInfo {
        match self {
            VendorTemplate::CiscoWlc => VendorInfo {
                id: "ciscoWLC",
                name: "Cisco WLC (Wireless Controller)",
                description: "Cisco Wireless LAN Controller discovery",
                sub_option_type: Some(241),
                fields: CONTROLLER_IPS,
            },
            VendorTemplate::ArubaController => VendorInfo {
                id: "arubaController",
                name: "Aruba Controller",
                description: "Aruba wireless controller discovery",
                sub_option_type: Some(1),
                fields: CONTROLLER_IPS,
            },
            VendorTemplate::UbiquitiUnifi => VendorInfo {
                id: "ubiquitiUnifi",
                name: "Ubiquiti UniFi",
                description: "UniFi controller discovery",
                sub_option_type: Some(1),
                fields: &[VendorField {
                    id: "controllerUrl",
                    name: "Controller URL",
                    kind: "string",
                    required: true,
                    placeholder: Some("http://unifi.local:8080/inform"),
                }],
            },
            VendorTemplate::Meraki => VendorInfo {
                id: "meraki",
                name: "Cisco Meraki",
                description: "Meraki cloud controller",
                sub_option_type: Some(1),
                fields: CONTROLLER_IPS,
            },
            VendorTemplate::PolycomPhones => VendorInfo {
                id: "polycomPhones",
                name: "Polycom Phones",
                description: "Polycom VoIP phone provisioning",
                sub_option_type: None,
                fields: &[VendorField {
                    id: "provisioningUrl",
                    name: "Provisioning Server URL",
                    kind: "string",
                    required: true,
                    placeholder: Some("http://provisioning.example.com"),
                }],
            },
            VendorTemplate::Custom => VendorInfo {
                id: "custom",
                name: "Custom TLV",
                description: "Define custom TLV encoding",
                sub_option_type: None,
                fields: &[VendorField {
                    id: "entries",
                    name: "TLV Entries",
                    kind: "tlv-list",
                    required: true,
                    placeholder: None,
                }],
            },
        }
    }

    pub fn id(&self) -> &'static str {
        self.info().id
    }

    /// Option 43 payload for `config`.
    pub fn encode(&self, config: &VendorConfig) -> Vec<u8> {
        match self {
            VendorTemplate::CiscoWlc => encode_ip_list(241, &config.controller_ips),
            VendorTemplate::ArubaController | VendorTemplate::Meraki => {
                encode_ip_list(1, &config.controller_ips)
            }
            VendorTemplate::UbiquitiUnifi => encode_or_skip(1, config.controller_url.as_bytes()),
            VendorTemplate::PolycomPhones => config.provisioning_url.as_bytes().to_vec(),
            VendorTemplate::Custom => config
                .entries
                .iter()
                .flat_map(|entry| encode_or_skip(entry.code, &entry.value))
                .collect(),
        }
    }
}

fn encode_or_skip(code: u8, value: &[u8]) -> Vec<u8> {
    encode_tlv(code, value).unwrap_or_else(|e| {
        log::warn!("Skipping vendor sub-option {code}: {e}");
        vec![]
    })
}

/// One `[code, 4, a, b, c, d]` record per valid address.
fn encode_ip_list(code: u8, ips: &[String]) -> Vec<u8> {
    ips.iter()
        .flat_map(|ip| match ip_to_bytes(ip) {
            Some(octets) => encode_or_skip(code, &octets),
            None => {
                log::warn!("Skipping invalid controller IP '{ip}'");
                vec![]
            }
        })
        .collect()
}

impl fmt::Display for VendorTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for VendorTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VendorTemplate::ALL
            .into_iter()
            .find(|t| t.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown vendor template: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ips(list: &[&str]) -> VendorConfig {
        VendorConfig {
            controller_ips: list.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_cisco_wlc() {
        let bytes = VendorTemplate::CiscoWlc.encode(&ips(&["10.0.100.10", "bad", "10.0.100.11"]));
        assert_eq!(bytes, vec![241, 4, 10, 0, 100, 10, 241, 4, 10, 0, 100, 11]);
    }

    #[test]
    fn test_aruba_and_meraki_use_sub_option_1() {
        let config = ips(&["192.168.1.5"]);
        assert_eq!(VendorTemplate::ArubaController.encode(&config), vec![1, 4, 192, 168, 1, 5]);
        assert_eq!(VendorTemplate::Meraki.encode(&config), vec![1, 4, 192, 168, 1, 5]);
    }

    #[test]
    fn test_unifi_and_polycom_urls() {
        let config = VendorConfig {
            controller_url: "http://u:8080".to_string(),
            provisioning_url: "http://p".to_string(),
            ..Default::default()
        };
        let unifi = VendorTemplate::UbiquitiUnifi.encode(&config);
        assert_eq!(&unifi[..2], &[1, 13]);
        assert_eq!(&unifi[2..], b"http://u:8080");
        assert_eq!(VendorTemplate::PolycomPhones.encode(&config), b"http://p".to_vec());

        let too_long = VendorConfig {
            controller_url: "x".repeat(300),
            ..Default::default()
        };
        assert!(VendorTemplate::UbiquitiUnifi.encode(&too_long).is_empty());
    }

    #[test]
    fn test_custom_entries() {
        let config = VendorConfig {
            entries: vec![Tlv::new(5, &[1, 2]), Tlv::new(6, &[0; 256]), Tlv::new(7, &[])],
            ..Default::default()
        };
        assert_eq!(VendorTemplate::Custom.encode(&config), vec![5, 2, 1, 2, 7, 0]);
    }

    #[test]
    fn test_template_ids_and_serde() {
        for template in VendorTemplate::ALL {
            assert_eq!(template.id().parse::<VendorTemplate>(), Ok(template));
            let json = serde_json::to_string(&template).unwrap();
            assert_eq!(json, format!("\"{}\"", template.id()));
        }
        assert_eq!(VendorTemplate::CiscoWlc.info().sub_option_type, Some(241));
        let config: VendorConfig =
            serde_json::from_str(r#"{"controllerIPs":["10.0.0.1"]}"#).unwrap();
        assert_eq!(config.controller_ips, vec!["10.0.0.1"]);
    }
}
