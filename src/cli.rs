//! Command line interface.
//!
//! [`run`] turns parsed arguments into output lines. Printing is left to
//! `main.rs`.

use crate::cloud::{get_cloud_usable_hosts, get_reserved_ip_details, Provider};
use crate::config::{Settings, IPV6_SPLIT_LIMIT, IP_LIST_LIMIT};
use crate::dhcp::{
    bytes_to_hex, decode_option_119, decode_option_121, decode_tlv, encode_option_119,
    encode_option_121, hex_to_bytes, Route, VendorConfig, VendorTemplate,
};
use crate::models::ipv6::split_ipv6_subnet;
use crate::models::{
    get_ipv6_address_type, list_subnet_ips, parse_cidr, parse_ipv6_cidr, split_subnet,
    supernet_subnets, Ipv4, VpcPlan,
};
use crate::output::{
    generate_dhcp_config, generate_iac, label_line, plan_for_block, render_blocks,
    render_cidr_info, render_free_blocks, render_ipv6_blocks, render_ipv6_info,
    render_plan_report, warning_line, DhcpServerConfig, IacFormat, ServerType,
};
use crate::processing::{
    analyze_plan, find_free_blocks, log_plan_warnings, plan_free_blocks, quick_add,
    QuickAddPattern,
};
use crate::state::{decode_state, encode_state, is_url_too_long, shareable_url, ShareState};
use clap::{Parser, Subcommand, ValueEnum};
use itertools::Itertools;
use serde::Serialize;
use serde_json::json;
use std::error::Error;
use std::net::Ipv4Addr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "subnet-zero")]
#[command(about = "Subnet calculator, VPC planner and DHCP option builder")]
#[command(version)]
pub struct Cli {
    /// Reserved-address policy: aws, azure, gcp or traditional.
    #[arg(short, long, global = true, value_parser = parse_provider)]
    pub provider: Option<Provider>,
    /// Print JSON instead of a table where supported.
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

fn parse_provider(s: &str) -> Result<Provider, String> {
    Provider::parse_strict(s)
        .ok_or_else(|| format!("Unknown provider '{s}', expected aws, azure, gcp or traditional"))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DecodeKind {
    Tlv,
    Routes,
    Domains,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Details of an IPv4 or IPv6 CIDR block.
    Calc { cidr: String },
    /// Split a block into equal sub-blocks.
    Split {
        cidr: String,
        prefix: u8,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Smallest block containing all given blocks.
    Supernet {
        #[arg(required = true)]
        cidrs: Vec<String>,
    },
    /// Free aligned blocks of one size inside a parent.
    Free {
        parent: String,
        prefix: u8,
        #[arg(long = "used")]
        used: Vec<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Addresses of a block with their role.
    Ips {
        cidr: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Analyse a VPC plan stored as JSON.
    Plan {
        file: PathBuf,
        #[arg(long = "quick-add")]
        quick_add: Option<QuickAddPattern>,
        /// Also list free blocks of this prefix.
        #[arg(long)]
        free: Option<u8>,
        #[arg(long)]
        iac: Option<IacFormat>,
        /// Print the share-state fragment for the plan.
        #[arg(long)]
        share: bool,
    },
    /// Encode Option 121 routes given as `dest/len,gateway`.
    Routes {
        #[arg(required = true)]
        routes: Vec<Route>,
    },
    /// Encode an Option 119 domain search list.
    Domains {
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// Encode Option 43 from a vendor template.
    Vendor {
        template: VendorTemplate,
        #[arg(long = "ip")]
        ips: Vec<String>,
        #[arg(long)]
        url: Option<String>,
    },
    /// Decode option bytes given as hex.
    Decode {
        hex: String,
        #[arg(long = "as", value_enum, default_value_t = DecodeKind::Tlv)]
        kind: DecodeKind,
    },
    /// Render a DHCP server configuration.
    Export {
        server: ServerType,
        #[arg(long)]
        gateway: Option<Ipv4Addr>,
        #[arg(long)]
        netmask: Option<String>,
        #[arg(long)]
        dns: Vec<String>,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        lease: Option<u32>,
        /// Pre-encoded Option 43 bytes as hex.
        #[arg(long)]
        option43: Option<String>,
        #[arg(long = "route")]
        routes: Vec<Route>,
        #[arg(long = "search")]
        search: Vec<String>,
    },
    /// Terraform or CloudFormation for a single block.
    Iac {
        cidr: String,
        #[arg(long, default_value_t = IacFormat::Terraform)]
        format: IacFormat,
    },
    /// Encode a calculator session, or decode one with --decode.
    Share {
        cidr: Option<String>,
        #[arg(long)]
        decode: Option<String>,
        #[arg(long = "base-url")]
        base_url: Option<String>,
    },
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<String>, Box<dyn Error>> {
    Ok(vec![serde_json::to_string_pretty(value)?])
}

fn hex_lines(bytes: &[u8]) -> Vec<String> {
    vec![
        label_line("Hex", bytes_to_hex(bytes, ":")),
        label_line("Bytes", bytes.iter().join(", ")),
        label_line("Length", bytes.len()),
    ]
}

fn read_plan(file: &PathBuf) -> Result<VpcPlan, Box<dyn Error>> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| format!("Error reading plan file {}: {e}", file.display()))?;
    let mut deserializer = serde_json::Deserializer::from_str(&text);
    let mut plan: VpcPlan = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        format!(
            "Error parsing plan file {}: path={} error={}",
            file.display(),
            e.path(),
            e.inner()
        )
    })?;
    plan.normalize_ids();
    log::info!("Read plan {} with {} subnet(s)", plan.name, plan.subnets.len());
    Ok(plan)
}

/// Execute one command and return what should be printed.
pub fn run(cli: Cli, settings: &Settings) -> Result<Vec<String>, Box<dyn Error>> {
    let provider = cli.provider.unwrap_or(settings.provider);
    log::debug!("run {:?} provider={provider}", cli.command);

    match cli.command {
        Commands::Calc { cidr } => {
            if cidr.contains(':') {
                let info = parse_ipv6_cidr(&cidr)?;
                if cli.json {
                    return to_json(&info);
                }
                let mut lines = render_ipv6_info(&info);
                let kind = get_ipv6_address_type(&info.network_address);
                lines.push(label_line(
                    "Address type",
                    format!("{} - {}", kind.name(), kind.description()),
                ));
                Ok(lines)
            } else {
                let info = parse_cidr(&cidr)?;
                let cloud = get_cloud_usable_hosts(info.prefix, provider);
                let reserved = get_reserved_ip_details(info.network_address, info.prefix, provider);
                if cli.json {
                    return to_json(&json!({
                        "subnet": info,
                        "cloud": cloud,
                        "reserved": reserved,
                    }));
                }
                Ok(render_cidr_info(&info, provider, &cloud, &reserved))
            }
        }
        Commands::Split { cidr, prefix, limit } => {
            if cidr.contains(':') {
                let blocks = split_ipv6_subnet(&cidr, prefix, limit.unwrap_or(IPV6_SPLIT_LIMIT))?;
                return if cli.json { to_json(&blocks) } else { Ok(render_ipv6_blocks(&blocks)) };
            }
            let mut blocks = split_subnet(&cidr, prefix)?;
            if let Some(limit) = limit {
                blocks.truncate(limit);
            }
            if cli.json {
                to_json(&blocks)
            } else {
                Ok(render_blocks(&blocks))
            }
        }
        Commands::Supernet { cidrs } => {
            let block = supernet_subnets(&cidrs)
                .ok_or_else(|| format!("No supernet for {}", cidrs.join(" ")))?;
            Ok(render_blocks(&[block]))
        }
        Commands::Free { parent, prefix, used, limit } => {
            let parent = Ipv4::new(&parent)?.network();
            let used = used.iter().map(|c| Ipv4::new(c)).collect::<Result<Vec<Ipv4>, _>>()?;
            let limit = limit.unwrap_or(settings.free_block_limit);
            let blocks = find_free_blocks(parent, &used, prefix, limit);
            if blocks.is_empty() {
                log::warn!("No free /{prefix} in {parent}");
            }
            if cli.json {
                to_json(&blocks)
            } else {
                Ok(render_free_blocks(&blocks))
            }
        }
        Commands::Ips { cidr, limit } => {
            let ips = list_subnet_ips(&cidr, limit.unwrap_or(IP_LIST_LIMIT))?;
            if cli.json {
                return to_json(&ips);
            }
            Ok(ips
                .iter()
                .map(|ip| format!("{:>6} {:<16} {:?}", ip.index, ip.ip, ip.role))
                .collect())
        }
        Commands::Plan { file, quick_add: pattern, free, iac, share } => {
            let mut plan = read_plan(&file)?;
            if cli.provider.is_some() {
                plan.provider = provider;
            }
            if let Some(pattern) = pattern {
                quick_add(&mut plan, pattern)?;
            }
            let report = analyze_plan(&plan)?;
            log_plan_warnings(&report.warnings);

            let mut lines = if cli.json { to_json(&report)? } else { render_plan_report(&report) };
            if let Some(prefix) = free {
                let blocks = plan_free_blocks(&plan, prefix, settings.free_block_limit)?;
                lines.extend(render_free_blocks(&blocks));
            }
            if let Some(format) = iac {
                lines.push(generate_iac(format, &plan));
            }
            if share {
                lines.push(encode_state(&ShareState::planner(&plan))?);
            }
            Ok(lines)
        }
        Commands::Routes { routes } => Ok(hex_lines(&encode_option_121(&routes))),
        Commands::Domains { domains } => Ok(hex_lines(&encode_option_119(&domains))),
        Commands::Vendor { template, ips, url } => {
            let url = url.unwrap_or_default();
            let config = VendorConfig {
                controller_ips: ips,
                controller_url: url.clone(),
                provisioning_url: url,
                entries: vec![],
            };
            let bytes = template.encode(&config);
            let mut lines = vec![label_line("Template", template.info().name)];
            lines.extend(hex_lines(&bytes));
            Ok(lines)
        }
        Commands::Decode { hex, kind } => {
            let bytes = hex_to_bytes(&hex)?;
            match kind {
                DecodeKind::Tlv => {
                    let records = decode_tlv(&bytes)?;
                    if cli.json {
                        return to_json(&records);
                    }
                    Ok(records
                        .iter()
                        .map(|r| {
                            label_line(&format!("type {}", r.code), bytes_to_hex(&r.value, ":"))
                        })
                        .collect())
                }
                DecodeKind::Routes => {
                    let routes = decode_option_121(&bytes)?;
                    if cli.json {
                        return to_json(&routes);
                    }
                    Ok(routes.iter().map(|r| r.to_string()).collect())
                }
                DecodeKind::Domains => Ok(decode_option_119(&bytes)?),
            }
        }
        Commands::Export {
            server,
            gateway,
            netmask,
            dns,
            domain,
            lease,
            option43,
            routes,
            search,
        } => {
            let mut config = gateway.map(DhcpServerConfig::for_gateway).unwrap_or_default();
            if let Some(netmask) = netmask {
                config.netmask = netmask;
            }
            if let Some(domain) = domain {
                config.domain = domain;
            }
            if lease.is_some() {
                config.lease_time = lease;
            }
            config.dns = dns;
            config.options.option43 = match option43 {
                Some(hex) => hex_to_bytes(&hex)?,
                None => vec![],
            };
            config.options.option121 = routes;
            config.options.option119 = search;
            Ok(vec![generate_dhcp_config(server, &config)])
        }
        Commands::Iac { cidr, format } => {
            let plan = plan_for_block(Ipv4::new(&cidr)?, provider);
            Ok(vec![generate_iac(format, &plan)])
        }
        Commands::Share { cidr, decode, base_url } => {
            if let Some(encoded) = decode {
                return to_json(&decode_state(&encoded)?);
            }
            let cidr = cidr.ok_or("Either a CIDR or --decode is required")?;
            let state = ShareState::calculator(&cidr, provider);
            match base_url {
                Some(base) => {
                    let mut lines = vec![shareable_url(&base, &state)?];
                    if is_url_too_long(&base, &state, None)? {
                        lines.push(warning_line(
                            "Share URL is longer than browsers reliably accept",
                        ));
                    }
                    Ok(lines)
                }
                None => Ok(vec![encode_state(&state)?]),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> Result<Vec<String>, Box<dyn Error>> {
        let cli = Cli::try_parse_from(args)?;
        run(cli, &Settings::default())
    }

    #[test]
    fn test_parse_provider_is_strict() {
        let aws = Cli::try_parse_from(["subnet-zero", "-p", "aws", "calc", "10.0.0.0/24"]);
        assert_eq!(aws.unwrap().provider, Some(Provider::Aws));
        let oracle = Cli::try_parse_from(["subnet-zero", "--provider", "oracle", "calc", "1/1"]);
        assert!(oracle.is_err());
    }

    #[test]
    fn test_calc_ipv4_json() {
        let lines =
            run_args(&["subnet-zero", "--json", "-p", "aws", "calc", "10.0.1.0/24"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value["subnet"]["networkAddress"], "10.0.1.0");
        assert_eq!(value["cloud"]["usable"], 251);
        assert_eq!(value["reserved"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_calc_ipv6() {
        let lines = run_args(&["subnet-zero", "calc", "2600:1f18::/56"]).unwrap();
        assert!(lines.iter().any(|l| l.contains("Small Site")));
        assert!(lines.iter().any(|l| l.contains("4722366482869645213696")));
    }

    #[test]
    fn test_calc_invalid() {
        let err = run_args(&["subnet-zero", "calc", "10.0.0.300/24"]).unwrap_err();
        assert!(err.to_string().starts_with("Octets must be 0-255"));
    }

    #[test]
    fn test_split_and_supernet() {
        let lines = run_args(&["subnet-zero", "split", "10.0.0.0/24", "26"]).unwrap();
        assert_eq!(lines.len(), 5);
        let lines = run_args(&["subnet-zero", "supernet", "10.0.0.0/24", "10.0.1.0/24"]).unwrap();
        assert!(lines[1].contains("\"10.0.0.0/23\""));
    }

    #[test]
    fn test_free() {
        let lines = run_args(&[
            "subnet-zero",
            "--json",
            "free",
            "10.0.0.0/16",
            "24",
            "--used",
            "10.0.0.0/24",
            "--limit",
            "2",
        ])
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value[0]["cidr"], "10.0.1.0/24");
        assert_eq!(value[0]["contiguous"], true);
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_routes_and_decode() {
        let lines = run_args(&["subnet-zero", "routes", "192.168.10.0/24,10.0.1.1"]).unwrap();
        assert!(lines[0].contains("18:c0:a8:0a:0a:00:01:01"));
        let lines =
            run_args(&["subnet-zero", "decode", "18:c0:a8:0a:0a:00:01:01", "--as", "routes"])
                .unwrap();
        assert_eq!(lines, vec!["192.168.10.0/24 via 10.0.1.1"]);
    }

    #[test]
    fn test_vendor() {
        let lines =
            run_args(&["subnet-zero", "vendor", "ciscoWLC", "--ip", "10.0.100.10"]).unwrap();
        assert!(lines[1].contains("f1:04:0a:00:64:0a"));
    }

    #[test]
    fn test_export_cisco() {
        let lines = run_args(&[
            "subnet-zero",
            "export",
            "ciscoIos",
            "--gateway",
            "10.9.0.1",
            "--option43",
            "f1040a00640a",
        ])
        .unwrap();
        assert!(lines[0].contains("network 10.9.0.0 255.255.255.0"));
        assert!(lines[0].contains("option 43 hex f1.04.0a.00.64.0a"));
    }

    #[test]
    fn test_plan_file() {
        let lines =
            run_args(&["subnet-zero", "--json", "plan", "src/tests/test_data/plan_aws.json"])
                .unwrap();
        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value["space"]["totalIPs"], 65536);
        assert_eq!(value["overlaps"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_share_round_trip() {
        let lines = run_args(&["subnet-zero", "-p", "gcp", "share", "10.0.0.0/24"]).unwrap();
        let decoded = run_args(&["subnet-zero", "share", "--decode", &lines[0]]).unwrap();
        assert!(decoded[0].contains("\"provider\": \"gcp\""));
    }
}
