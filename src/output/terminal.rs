//! Terminal output utilities.
//!
//! Renderers return lines instead of printing so the CLI stays thin and the
//! layouts can be tested.

use crate::cloud::{CloudUsableHosts, Provider, ReservedIp};
use crate::models::ipv6::Ipv6Subnet;
use crate::models::{get_first_host, get_last_host, get_usable_hosts, CidrInfo, Ipv4, Ipv6CidrInfo};
use crate::processing::{FreeBlock, PlanReport};
use colored::Colorize;
use itertools::Itertools;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Comma separated row of [`format_field`] cells.
pub fn csv_line<T: ToString>(cells: &[(T, usize)]) -> String {
    cells
        .iter()
        .map(|(value, width)| format_field(value.to_string(), *width))
        .join(",")
}

pub fn label_line<T: ToString>(label: &str, value: T) -> String {
    format!("{}: {}", format!("{label:>20}").bold(), value.to_string())
}

pub fn warning_line(message: &str) -> String {
    format!("#{}# {message}", "WARN".on_yellow())
}

/// Calculator view of an IPv4 block with the provider's usable range.
pub fn render_cidr_info(
    info: &CidrInfo,
    provider: Provider,
    cloud: &CloudUsableHosts,
    reserved: &[ReservedIp],
) -> Vec<String> {
    let mut lines = vec![
        label_line("Network", format!("{}/{}", info.network_address, info.prefix).cyan()),
        label_line("Broadcast", info.broadcast_address),
        label_line("Subnet mask", info.subnet_mask),
        label_line("Wildcard mask", info.wildcard_mask),
        label_line("First host", info.first_host),
        label_line("Last host", info.last_host),
        label_line("Total addresses", info.total_hosts),
        label_line("Usable hosts", info.usable_hosts),
        label_line("Binary mask", &info.binary.mask),
        label_line(
            &format!("{} usable", provider.profile().name),
            cloud.usable.to_string().green(),
        ),
    ];
    for ip in reserved {
        let label = format!("reserved +{}", ip.offset);
        lines.push(label_line(&label, format!("{} {}", ip.ip, ip.name)));
    }
    if let Some(warning) = &cloud.warning {
        lines.push(warning_line(&warning.to_string()));
    }
    lines
}

pub fn render_ipv6_info(info: &Ipv6CidrInfo) -> Vec<String> {
    vec![
        label_line("Network", format!("{}/{}", info.network_address, info.prefix).cyan()),
        label_line("Expanded", &info.network_address_expanded),
        label_line("Last address", &info.last_address),
        label_line("Total addresses", &info.total_addresses_formatted),
        label_line("Exact count", info.total_addresses),
        label_line(
            "Allocation",
            format!("{} - {}", info.subnet_info.name, info.subnet_info.description),
        ),
    ]
}

/// Header plus one row per block.
pub fn render_blocks(blocks: &[Ipv4]) -> Vec<String> {
    let mut lines = vec![csv_line(&[
        ("cnt", 6),
        ("cidr", 20),
        ("first", 17),
        ("last", 17),
        ("usable", 10),
    ])];
    for (i, block) in blocks.iter().enumerate() {
        lines.push(csv_line(&[
            (i.to_string(), 6),
            (block.network().to_string(), 20),
            (get_first_host(block.addr, block.mask).to_string(), 17),
            (get_last_host(block.addr, block.mask).to_string(), 17),
            (get_usable_hosts(block.mask).to_string(), 10),
        ]));
    }
    lines
}

pub fn render_ipv6_blocks(blocks: &[Ipv6Subnet]) -> Vec<String> {
    let mut lines = vec![csv_line(&[("cnt", 6), ("cidr", 44)])];
    for block in blocks {
        lines.push(csv_line(&[(block.index.to_string(), 6), (block.cidr.clone(), 44)]));
    }
    lines
}

pub fn render_free_blocks(blocks: &[FreeBlock]) -> Vec<String> {
    let mut lines = vec![csv_line(&[
        ("cnt", 6),
        ("cidr", 20),
        ("end", 17),
        ("size", 10),
        ("contiguous", 12),
    ])];
    for (i, block) in blocks.iter().enumerate() {
        lines.push(csv_line(&[
            (i.to_string(), 6),
            (block.cidr.to_string(), 20),
            (block.end.to_string(), 17),
            (block.size.to_string(), 10),
            (block.contiguous.to_string(), 12),
        ]));
    }
    lines
}

/// Space summary, subnet table, gaps and warnings of an analysed plan.
pub fn render_plan_report(report: &PlanReport) -> Vec<String> {
    let space = &report.space;
    let mut lines = vec![
        label_line("VPC", report.vpc.to_string().cyan()),
        label_line(
            "Used",
            format!("{} / {} ({:.1}%)", space.used_ips, space.total_ips, space.used_percent),
        ),
        label_line("Remaining", space.remaining_ips),
        csv_line(&[("name", 24), ("cidr", 20), ("tier", 12), ("az", 16), ("usable", 10)]),
    ];
    for subnet in &report.subnets {
        let usable = match &subnet.hosts {
            Some(hosts) => hosts.usable.to_string(),
            None => "-".to_string(),
        };
        lines.push(csv_line(&[
            (subnet.name.clone(), 24),
            (subnet.cidr.clone(), 20),
            (subnet.tier.to_string(), 12),
            (subnet.az.clone(), 16),
            (usable, 10),
        ]));
    }
    if !report.gaps.is_empty() {
        lines.push(label_line("Free", report.gaps.iter().join(" ").green()));
    }
    for warning in &report.warnings {
        lines.push(warning_line(&warning.to_string()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::{get_cloud_usable_hosts, get_reserved_ip_details};
    use crate::models::parse_cidr;

    #[test]
    fn test_format_field_short() {
        assert_eq!(format_field("test", 10), "    \"test\"");
    }

    #[test]
    fn test_format_field_long() {
        assert_eq!(format_field("10.100.200.0/24", 5), "\"10.100.200.0/24\"");
    }

    #[test]
    fn test_format_field_number() {
        assert_eq!(format_field(251, 6), " \"251\"");
    }

    #[test]
    fn test_csv_line() {
        assert_eq!(csv_line(&[("a", 4), ("bc", 3)]), " \"a\",\"bc\"");
    }

    #[test]
    fn test_render_blocks() {
        let blocks = vec![Ipv4::new("10.0.0.0/26").unwrap(), Ipv4::new("10.0.0.64/26").unwrap()];
        let lines = render_blocks(&blocks);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("\"10.0.0.64/26\""));
        assert!(lines[2].contains("\"10.0.0.126\""));
        assert!(lines[2].ends_with("\"62\""));
    }

    #[test]
    fn test_render_cidr_info_with_warning() {
        let info = parse_cidr("10.0.0.0/29").unwrap();
        let cloud = get_cloud_usable_hosts(29, Provider::Aws);
        let reserved = get_reserved_ip_details(info.network_address, 29, Provider::Aws);
        let lines = render_cidr_info(&info, Provider::Aws, &cloud, &reserved);
        assert!(lines.iter().any(|l| l.contains("10.0.0.0/29")));
        assert_eq!(lines.iter().filter(|l| l.contains("reserved +")).count(), 5);
        assert!(lines.last().unwrap().contains("WARN"));
    }
}
