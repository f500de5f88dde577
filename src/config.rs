//! Defaults and environment driven settings.
//!
//! `.env` is loaded by the binary via `dotenv` before [`Settings::from_env`]
//! runs, so every value can be overridden per checkout.

use crate::cloud::Provider;

/// Candidate blocks returned by the free-space finder.
pub const FREE_BLOCK_LIMIT: usize = 10;
/// Sub-blocks returned when splitting an IPv6 prefix.
pub const IPV6_SPLIT_LIMIT: usize = 256;
/// Addresses listed by `list_subnet_ips`.
pub const IP_LIST_LIMIT: usize = 256;
/// Browser-safe length for a share URL.
pub const MAX_SHARE_URL_LENGTH: usize = 2048;
pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";
pub const DEFAULT_LOG_LEVEL: &str = "info";

const ENV_PROVIDER: &str = "SUBNET_ZERO_PROVIDER";
const ENV_FREE_BLOCK_LIMIT: &str = "SUBNET_ZERO_FREE_BLOCK_LIMIT";
const ENV_LOG_CONFIG: &str = "SUBNET_ZERO_LOG_CONFIG";
const ENV_LOG_LEVEL: &str = "SUBNET_ZERO_LOG_LEVEL";

/// Runtime settings for the command line tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub provider: Provider,
    pub free_block_limit: usize,
    pub log_config: String,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            provider: Provider::Traditional,
            free_block_limit: FREE_BLOCK_LIMIT,
            log_config: DEFAULT_LOG_CONFIG.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Settings {
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup, unknown or unparsable values keep
    /// the default.
    pub fn from_lookup<F>(lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        if let Some(provider) = lookup(ENV_PROVIDER) {
            settings.provider = Provider::from_id(&provider);
        }
        if let Some(limit) = lookup(ENV_FREE_BLOCK_LIMIT) {
            match limit.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => settings.free_block_limit = limit,
                _ => log::warn!(
                    "Ignoring {ENV_FREE_BLOCK_LIMIT}={limit}, expected a positive number"
                ),
            }
        }
        if let Some(path) = lookup(ENV_LOG_CONFIG) {
            settings.log_config = path;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            settings.log_level = level;
        }
        settings
    }
}
