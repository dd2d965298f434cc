//! Runtime configuration from environment variables.

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

use crate::limiter::{InvalidQuota, Quota};
use crate::stations::DEFAULT_STATIONS_URL;

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name}={value:?} is invalid: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("rate limit: {0}")]
    RateLimit(#[from] InvalidQuota),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub listen_addr: SocketAddr,

    /// Upstream station list endpoint
    pub stations_url: String,

    /// Serve stations from this file instead of the upstream feed
    pub stations_file: Option<PathBuf>,

    /// How long a fetched station list is reused
    pub stations_cache_ttl: Duration,

    /// Enables provider distances and routes
    pub maps_api_key: Option<String>,

    /// Review database; reviews are kept in memory when unset
    pub postgres_uri: Option<String>,

    /// Quota for the distance and route endpoints, per client
    pub rate_limit: Quota,

    /// How often idle rate-limit buckets are dropped
    pub rate_limit_sweep: Duration,

    /// Upper bound on the nearby search `limit`
    pub nearby_max_limit: usize,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let period_secs: u64 = parse(&get, "RATE_LIMIT_PERIOD_SECS", 60)?;
        let burst: u32 = parse(&get, "RATE_LIMIT_BURST", 10)?;
        let rate_limit = Quota::per_period(Duration::from_secs(period_secs), burst)?;

        let sweep_secs: u64 = parse(&get, "RATE_LIMIT_SWEEP_SECS", 300)?;
        if sweep_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "RATE_LIMIT_SWEEP_SECS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            listen_addr: parse(&get, "LISTEN_ADDR", SocketAddr::from(([0, 0, 0, 0], 3001)))?,
            stations_url: get("STATIONS_API_URL")
                .unwrap_or_else(|| DEFAULT_STATIONS_URL.to_string()),
            stations_file: get("STATIONS_FILE").map(PathBuf::from),
            stations_cache_ttl: Duration::from_secs(parse(&get, "STATIONS_CACHE_TTL_SECS", 60)?),
            maps_api_key: get("GOOGLE_MAPS_API_KEY"),
            postgres_uri: get("POSTGRES_URI"),
            rate_limit,
            rate_limit_sweep: Duration::from_secs(sweep_secs),
            nearby_max_limit: parse(&get, "NEARBY_MAX_LIMIT", 100)?,
        })
    }

    /// Log the effective settings. Secrets are left out.
    pub fn log(&self) {
        info!(
            listen_addr = %self.listen_addr,
            stations = %self
                .stations_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| self.stations_url.clone()),
            stations_cache_ttl_secs = self.stations_cache_ttl.as_secs(),
            rate_limit_period_secs = self.rate_limit.period().as_secs(),
            rate_limit_burst = self.rate_limit.burst(),
            nearby_max_limit = self.nearby_max_limit,
            "configuration loaded"
        );
    }
}

fn parse<T>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match get(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:3001".parse().unwrap());
        assert_eq!(config.stations_url, DEFAULT_STATIONS_URL);
        assert!(config.stations_file.is_none());
        assert_eq!(config.stations_cache_ttl, Duration::from_secs(60));
        assert!(config.maps_api_key.is_none());
        assert!(config.postgres_uri.is_none());
        assert_eq!(config.rate_limit.period(), Duration::from_secs(60));
        assert_eq!(config.rate_limit.burst(), 10);
        assert_eq!(config.rate_limit_sweep, Duration::from_secs(300));
        assert_eq!(config.nearby_max_limit, 100);
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("LISTEN_ADDR", "127.0.0.1:8080"),
            ("STATIONS_FILE", "/tmp/stations.json"),
            ("GOOGLE_MAPS_API_KEY", "abc"),
            ("RATE_LIMIT_BURST", "3"),
            ("RATE_LIMIT_PERIOD_SECS", " 30 "),
            ("NEARBY_MAX_LIMIT", "25"),
        ])
        .unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.stations_file, Some(PathBuf::from("/tmp/stations.json")));
        assert_eq!(config.maps_api_key.as_deref(), Some("abc"));
        assert_eq!(config.rate_limit.burst(), 3);
        assert_eq!(config.rate_limit.period(), Duration::from_secs(30));
        assert_eq!(config.nearby_max_limit, 25);
    }

    #[test]
    fn empty_values_are_unset() {
        let config = config_from(&[("GOOGLE_MAPS_API_KEY", ""), ("POSTGRES_URI", "  ")]).unwrap();
        assert!(config.maps_api_key.is_none());
        assert!(config.postgres_uri.is_none());
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let err = config_from(&[("RATE_LIMIT_BURST", "many")]).unwrap_err();
        assert!(err.to_string().starts_with("RATE_LIMIT_BURST=\"many\" is invalid"));
    }

    #[test]
    fn rejects_zero_burst() {
        let err = config_from(&[("RATE_LIMIT_BURST", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::RateLimit(InvalidQuota::ZeroBurst)));
    }

    #[test]
    fn rejects_zero_sweep() {
        assert!(config_from(&[("RATE_LIMIT_SWEEP_SECS", "0")]).is_err());
    }
}
