use std::net::IpAddr;
use std::time::Duration;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub sink_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub intake_path: String,
    pub geo_mode: GeoMode,
    pub echo_geo: bool,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub sink_timeout: Option<Duration>,
    pub log_level: String,
}

/// Where geolocation may come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoMode {
    /// Body fields first, then edge provider headers. The record's `country`
    /// falls back to the resolved geo country.
    HeaderFallback,
    /// Body fields only.
    BodyOnly,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let sink_url = env_required("LEADINTAKE_SINK_URL")?;

        let host: IpAddr = env_or("LEADINTAKE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid LEADINTAKE_HOST: {e}"))?;

        let port: u16 = env_or("LEADINTAKE_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid LEADINTAKE_PORT: {e}"))?;

        let intake_path = env_or("LEADINTAKE_PATH", "/api/lead");
        if !intake_path.starts_with('/') {
            return Err(format!("Invalid LEADINTAKE_PATH '{intake_path}': must start with '/'"));
        }

        let geo_mode = match env_or("LEADINTAKE_GEO_MODE", "headers").as_str() {
            "headers" => GeoMode::HeaderFallback,
            "body" => GeoMode::BodyOnly,
            other => return Err(format!("Invalid LEADINTAKE_GEO_MODE '{other}': expected 'headers' or 'body'")),
        };

        let echo_geo = parse_bool("LEADINTAKE_ECHO_GEO", &env_or("LEADINTAKE_ECHO_GEO", "true"))?;

        let max_body_size: usize = env_or("LEADINTAKE_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid LEADINTAKE_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("LEADINTAKE_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid LEADINTAKE_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sink_timeout = match std::env::var("LEADINTAKE_SINK_TIMEOUT_SECS").ok() {
            Some(secs) => Some(Duration::from_secs(
                secs.parse()
                    .map_err(|e| format!("Invalid LEADINTAKE_SINK_TIMEOUT_SECS: {e}"))?,
            )),
            None => None,
        };

        let log_level = env_or("LEADINTAKE_LOG_LEVEL", "info");

        Ok(Config {
            sink_url,
            host,
            port,
            intake_path,
            geo_mode,
            echo_geo,
            max_body_size,
            trusted_proxies,
            sink_timeout,
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("Invalid {key} '{other}': expected a boolean")),
    }
}
