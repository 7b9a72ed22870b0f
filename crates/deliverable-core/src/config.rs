//! Environment-driven process configuration.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DELIVERABLE_HOME` | `$HOME/.deliverable` |
//! | `DELIVERABLE_CACHE_PATH` | `<home>/cache/locations.duckdb` |
//! | `DELIVERABLE_VENDOR_TIMEOUT_MS` | unset (no timeout) |
//! | `DELIVERABLE_USER_AGENT` | browser-like UA |
//! | `DELIVERABLE_UBEREATS_CONFIRM` | `false` |
//! | `DELIVERABLE_HOST` / `DELIVERABLE_PORT` | `127.0.0.1` / `8000` |
//! | `DELIVERABLE_LOG`, then `RUST_LOG` | `info` |

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use deliverable_cache::LocationCacheConfig;

use crate::catalog::VendorSettings;
use crate::error::ConfigError;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Top-level configuration shared by the CLI and the web service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliverableConfig {
    pub home: PathBuf,
    pub cache_path: PathBuf,
    pub vendors: VendorSettings,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

impl DeliverableConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let home = lookup("DELIVERABLE_HOME")
            .map(PathBuf::from)
            .or_else(|| lookup("HOME").map(|home| PathBuf::from(home).join(".deliverable")))
            .unwrap_or_else(|| PathBuf::from(".deliverable"));
        let cache_path = lookup("DELIVERABLE_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join("cache").join("locations.duckdb"));

        let mut vendors = VendorSettings::default();
        if let Some(user_agent) = lookup("DELIVERABLE_USER_AGENT") {
            vendors.user_agent = user_agent;
        }
        vendors.timeout_ms = match lookup("DELIVERABLE_VENDOR_TIMEOUT_MS") {
            Some(value) => parse_timeout(&value)?,
            None => None,
        };
        vendors.confirm_uber_eats_location = match lookup("DELIVERABLE_UBEREATS_CONFIRM") {
            Some(value) => parse_flag("DELIVERABLE_UBEREATS_CONFIRM", &value)?,
            None => false,
        };

        let host = lookup("DELIVERABLE_HOST").unwrap_or_else(|| String::from(DEFAULT_HOST));
        let port = match lookup("DELIVERABLE_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue {
                    variable: "DELIVERABLE_PORT",
                    expected: "u16",
                    value,
                })?,
            None => DEFAULT_PORT,
        };

        let log_level = lookup("DELIVERABLE_LOG")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| String::from(DEFAULT_LOG_LEVEL));

        Ok(Self {
            home,
            cache_path,
            vendors,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
        })
    }

    pub fn cache_config(&self) -> LocationCacheConfig {
        LocationCacheConfig::at_path(self.cache_path.clone())
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.host.clone()))?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: String::from(DEFAULT_LOG_LEVEL),
        }
    }
}

// Zero means "no timeout", same as unset.
fn parse_timeout(value: &str) -> Result<Option<u64>, ConfigError> {
    let millis = value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue {
            variable: "DELIVERABLE_VENDOR_TIMEOUT_MS",
            expected: "number of milliseconds",
            value: value.to_owned(),
        })?;
    Ok((millis > 0).then_some(millis))
}

fn parse_flag(variable: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            variable,
            expected: "boolean",
            value: value.to_owned(),
        }),
    }
}
