//! Service configuration
//!
//! Every option can be given on the command line or through the environment
//! variable named next to it.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "public-concordances")]
#[command(about = "Resolves concordances between concept ids and external identifiers")]
pub struct ServiceConfig {
    /// System code reported by the health endpoints
    #[arg(long, env = "APP_SYSTEM_CODE", default_value = "public-concordance-api")]
    pub app_system_code: String,

    /// Concept documents (directory or single file) loaded into the graph
    #[arg(long, env = "GRAPH_DATA", default_value = "fixtures/concepts")]
    pub graph_data: PathBuf,

    /// Port to listen on
    #[arg(long, env = "APP_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Base URL used to build concept API URLs
    #[arg(long, env = "PUBLIC_API_URL", default_value = "http://api.ft.com")]
    pub public_api_url: String,

    /// Max-age of successful responses, e.g. 30s, 2h45m, 1.5h
    #[arg(long, env = "CACHE_DURATION", default_value = "30s")]
    pub cache_duration: String,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// API description served at /__api
    #[arg(long, env = "API_YML", default_value = "./api.yml")]
    pub api_yml: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid duration {0:?}")]
    InvalidDuration(String),
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
    #[error("negative duration {0:?}")]
    NegativeDuration(String),
}

impl ServiceConfig {
    pub fn cache_duration(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.cache_duration)
    }

    /// `Cache-Control` value for successful lookups
    pub fn cache_control_header(&self) -> Result<String, ConfigError> {
        Ok(cache_control_header(self.cache_duration()?))
    }
}

pub fn cache_control_header(max_age: Duration) -> String {
    format!("max-age={:.0}, public", max_age.as_secs_f64())
}

/// Nanoseconds per unit suffix
fn unit_nanos(unit: &str) -> Option<f64> {
    Some(match unit {
        "ns" => 1.0,
        "us" | "µs" | "μs" => 1e3,
        "ms" => 1e6,
        "s" => 1e9,
        "m" => 60e9,
        "h" => 3600e9,
        _ => return None,
    })
}

/// Parse a duration such as `300ms`, `1.5h` or `2h45m`
///
/// A bare `0` is accepted; any other number needs a unit.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration(input.to_string());

    let mut rest = input.trim();
    if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    } else if rest.starts_with('-') {
        return Err(ConfigError::NegativeDuration(input.to_string()));
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut nanos = 0f64;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() || number == "." {
            return Err(invalid());
        }
        let value: f64 = number.parse().map_err(|_| invalid())?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        if unit.is_empty() {
            return Err(invalid());
        }
        let scale = unit_nanos(unit).ok_or_else(|| ConfigError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        nanos += value * scale;
        rest = tail;
    }

    Ok(Duration::from_nanos(nanos.round() as u64))
}
