//! Shareable session state.
//!
//! A [`ShareState`] is the minimal plain-JSON snapshot of a calculator or
//! planner session. It travels as URL-safe base64 in a URL fragment.

use crate::cloud::{Provider, SubnetTier};
use crate::config::MAX_SHARE_URL_LENGTH;
use crate::error::StateError;
use crate::models::{Subnet, VpcPlan};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

pub const MODULE_CALCULATOR: &str = "subnet-calculator";
pub const MODULE_PLANNER: &str = "vpc-planner";

/// Subnet fields kept when sharing a plan.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SharedSubnet {
    pub name: String,
    pub cidr: String,
    pub tier: String,
    pub az: String,
}

impl From<&Subnet> for SharedSubnet {
    fn from(subnet: &Subnet) -> Self {
        SharedSubnet {
            name: subnet.name.clone(),
            cidr: subnet.cidr.clone(),
            tier: subnet.tier.id().to_string(),
            az: subnet.az.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShareState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnets: Option<Vec<SharedSubnet>>,
}

impl ShareState {
    pub fn calculator(cidr: &str, provider: Provider) -> ShareState {
        let ip_version = if cidr.contains(':') { "ipv6" } else { "ipv4" };
        ShareState {
            module: Some(MODULE_CALCULATOR.to_string()),
            cidr: Some(cidr.to_string()),
            provider: Some(provider.id().to_string()),
            ip_version: Some(ip_version.to_string()),
            ..Default::default()
        }
    }

    pub fn planner(plan: &VpcPlan) -> ShareState {
        ShareState {
            module: Some(MODULE_PLANNER.to_string()),
            provider: Some(plan.provider.id().to_string()),
            vpc_cidr: Some(plan.cidr.clone()),
            vpc_name: Some(plan.name.clone()),
            region: Some(plan.region.clone()),
            subnets: Some(plan.subnets.iter().map(SharedSubnet::from).collect()),
            ..Default::default()
        }
    }

    /// Rebuild a planner session. Subnets get fresh ids.
    pub fn to_plan(&self) -> Result<VpcPlan, StateError> {
        let cidr = self
            .vpc_cidr
            .as_deref()
            .ok_or_else(|| StateError::Invalid("VPC CIDR is missing".to_string()))?;
        let provider = self.provider.as_deref().map(Provider::from_id).unwrap_or_default();
        let mut plan = VpcPlan::new(
            self.vpc_name.as_deref().unwrap_or("main-vpc"),
            cidr,
            provider,
            self.region.as_deref().unwrap_or_default(),
        );
        for shared in self.subnets.iter().flatten() {
            let tier = shared.tier.parse::<SubnetTier>().map_err(StateError::Invalid)?;
            plan.add_subnet(Subnet::new(&shared.name, &shared.cidr, tier, &shared.az));
        }
        Ok(plan)
    }
}

/// Pick the shareable fields out of an arbitrary session object. Unknown
/// fields, and subnet fields other than name/cidr/tier/az, are dropped.
pub fn create_shareable_state(full: &serde_json::Value) -> Result<ShareState, StateError> {
    serde_path_to_error::deserialize(full).map_err(|e| StateError::Json {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

/// Problems with a decoded state, empty when it is usable.
pub fn validate_state(state: &ShareState) -> Vec<String> {
    let mut errors = vec![];
    match state.module.as_deref() {
        Some(MODULE_CALCULATOR) => {
            if let Some(provider) = &state.provider {
                if Provider::parse_strict(provider).is_none() {
                    errors.push(format!("Invalid provider: {provider}"));
                }
            }
            if let Some(version) = &state.ip_version {
                if version != "ipv4" && version != "ipv6" {
                    errors.push(format!("Invalid IP version: {version}"));
                }
            }
        }
        Some(MODULE_PLANNER) => {
            for subnet in state.subnets.iter().flatten() {
                if let Err(e) = subnet.tier.parse::<SubnetTier>() {
                    errors.push(e);
                }
            }
        }
        _ => {}
    }
    errors
}

pub fn encode_state(state: &ShareState) -> Result<String, StateError> {
    let json = serde_json::to_string(state).map_err(|e| StateError::Json {
        path: ".".to_string(),
        message: e.to_string(),
    })?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Inverse of [`encode_state`]. A leading `#` is ignored and the result is
/// validated.
pub fn decode_state(encoded: &str) -> Result<ShareState, StateError> {
    let encoded = encoded.trim().trim_start_matches('#');
    let bytes = URL_SAFE_NO_PAD.decode(encoded)?;
    let json = String::from_utf8(bytes)?;

    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let state: ShareState =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|e| StateError::Json {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        })?;

    let errors = validate_state(&state);
    if !errors.is_empty() {
        log::warn!("Rejected share state: {errors:?}");
        return Err(StateError::Invalid(errors.join("; ")));
    }
    Ok(state)
}

pub fn shareable_url(base_url: &str, state: &ShareState) -> Result<String, StateError> {
    Ok(format!("{base_url}#{}", encode_state(state)?))
}

/// Whether `base_url#state` exceeds `max_length` (browsers start failing
/// past [`MAX_SHARE_URL_LENGTH`]).
pub fn is_url_too_long(
    base_url: &str,
    state: &ShareState,
    max_length: Option<usize>,
) -> Result<bool, StateError> {
    let max_length = max_length.unwrap_or(MAX_SHARE_URL_LENGTH);
    Ok(shareable_url(base_url, state)?.len() > max_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_calculator_round_trip() {
        let state = ShareState::calculator("10.0.0.0/24", Provider::Aws);
        let encoded = encode_state(&state).unwrap();
        assert!(!encoded.contains('='));
        assert!(!encoded.contains('+') && !encoded.contains('/'));
        assert_eq!(decode_state(&encoded).unwrap(), state);
        assert_eq!(decode_state(&format!("#{encoded}")).unwrap(), state);
        let v6 = ShareState::calculator("2001:db8::/64", Provider::Gcp);
        assert_eq!(v6.ip_version.as_deref(), Some("ipv6"));
    }

    #[test]
    fn test_planner_round_trip() {
        let mut plan = VpcPlan::new("prod", "10.0.0.0/16", Provider::Azure, "eastus");
        plan.add_subnet(Subnet::new("web", "10.0.1.0/24", SubnetTier::Public, "eastus-1"));
        let state = ShareState::planner(&plan);
        let decoded = decode_state(&encode_state(&state).unwrap()).unwrap();
        let restored = decoded.to_plan().unwrap();
        assert_eq!(restored.cidr, "10.0.0.0/16");
        assert_eq!(restored.provider, Provider::Azure);
        assert_eq!(restored.subnets.len(), 1);
        assert_eq!(restored.subnets[0].tier, SubnetTier::Public);
    }

    #[test]
    fn test_create_shareable_state_drops_extra_fields() {
        let full = json!({
            "module": "vpc-planner",
            "vpcCidr": "10.0.0.0/16",
            "theme": "dark",
            "subnets": [{
                "id": 7,
                "name": "a",
                "cidr": "10.0.0.0/24",
                "tier": "private",
                "az": "",
                "hosts": 251
            }]
        });
        let state = create_shareable_state(&full).unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("theme").is_none());
        assert!(json.get("cidr").is_none());
        assert_eq!(
            json["subnets"][0],
            json!({ "name": "a", "cidr": "10.0.0.0/24", "tier": "private", "az": "" })
        );
    }

    #[test]
    fn test_create_shareable_state_reports_path() {
        let err = create_shareable_state(&json!({ "cidr": 24 })).unwrap_err();
        match err {
            StateError::Json { path, .. } => assert_eq!(path, "cidr"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_validate_state() {
        let mut state = ShareState::calculator("10.0.0.0/24", Provider::Aws);
        assert!(validate_state(&state).is_empty());
        state.provider = Some("oracle".to_string());
        assert_eq!(validate_state(&state), vec!["Invalid provider: oracle"]);

        let planner = ShareState {
            module: Some(MODULE_PLANNER.to_string()),
            subnets: Some(vec![SharedSubnet {
                tier: "dmz".to_string(),
                ..Default::default()
            }]),
            ..Default::default()
        };
        assert_eq!(validate_state(&planner).len(), 1);
        let encoded = encode_state(&planner).unwrap();
        assert!(matches!(decode_state(&encoded), Err(StateError::Invalid(_))));
    }

    #[test]
    fn test_decode_state_errors() {
        assert!(matches!(decode_state("***"), Err(StateError::Base64(_))));
        let not_json = URL_SAFE_NO_PAD.encode("{\"subnets\": 5}");
        match decode_state(&not_json) {
            Err(StateError::Json { path, .. }) => assert_eq!(path, "subnets"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_is_url_too_long() {
        let state = ShareState::calculator("10.0.0.0/24", Provider::Aws);
        assert!(!is_url_too_long("https://example.com/", &state, None).unwrap());
        assert!(is_url_too_long("https://example.com/", &state, Some(30)).unwrap());
    }
}
