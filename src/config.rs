//! Environment configuration.
//!
//! Values come from the process environment, with `.env` loaded by the
//! binary through dotenvy before [`Config::from_env`] runs.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8001";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LISTING_LIMIT: i64 = 100;
const DEFAULT_LISTING_CACHE_TTL_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    /// PostgreSQL URL; archived calculations stay in memory when unset
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub cors_origins: Vec<String>,
    /// Largest listing returned by the calculations endpoints
    pub listing_limit: i64,
    pub listing_cache_ttl: Duration,
    /// JSON wage table replacing the built-in one
    pub reference_data_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listing_limit = parse(&get, "LISTING_LIMIT", DEFAULT_LISTING_LIMIT)?;
        if listing_limit <= 0 {
            return Err(ConfigError::Invalid {
                key: "LISTING_LIMIT",
                value: listing_limit.to_string(),
            });
        }

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_url: get("DATABASE_URL"),
            database_max_connections: parse(
                &get,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            cors_origins: get("CORS_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            listing_limit,
            listing_cache_ttl: Duration::from_secs(parse(
                &get,
                "LISTING_CACHE_TTL_SECS",
                DEFAULT_LISTING_CACHE_TTL_SECS,
            )?),
            reference_data_path: get("REFERENCE_DATA_PATH").map(PathBuf::from),
        })
    }
}

fn parse<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
