//! Text renderers.
//!
//! - [`dhcp_export`] - DHCP server configuration dialects
//! - [`iac`] - Terraform and CloudFormation for a VPC plan
//! - [`terminal`] - Terminal output with colors

mod dhcp_export;
mod iac;
mod terminal;

pub use dhcp_export::{
    generate_cisco_ios, generate_dhcp_config, generate_dnsmasq, generate_isc_dhcp,
    generate_kea_dhcp, generate_raw_hex, generate_windows_dhcp, DhcpOptions, DhcpServerConfig,
    ServerType, ServerTypeInfo,
};
pub use iac::{
    generate_aws_terraform, generate_azure_terraform, generate_cloudformation_json,
    generate_gcp_terraform, generate_iac, generate_terraform, plan_for_block, IacFormat,
};
pub use terminal::{
    csv_line, format_field, label_line, render_blocks, render_cidr_info, render_free_blocks,
    render_ipv6_blocks, render_ipv6_info, render_plan_report, warning_line,
};
