//! Process configuration read from the environment

use crate::adapters::{DEFAULT_GENERATION_DELAY, DEFAULT_INGESTION_DELAY};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Settings for the desk server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskConfig {
    pub port: u16,
    /// Ingestion service endpoint; fixtures are used when absent
    pub ingestion_url: Option<String>,
    /// Drafting service endpoint; scripted replies are used when absent
    pub generation_url: Option<String>,
    pub ingestion_delay: Duration,
    pub generation_delay: Duration,
    pub http_timeout: Duration,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            ingestion_url: None,
            generation_url: None,
            ingestion_delay: DEFAULT_INGESTION_DELAY,
            generation_delay: DEFAULT_GENERATION_DELAY,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl DeskConfig {
    /// # Errors
    ///
    /// `InvalidNumber` when a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// `InvalidNumber` when a numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let url = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        Ok(Self {
            port: parse_number(&lookup, "DESK_PORT")?.unwrap_or(defaults.port),
            ingestion_url: url("DESK_INGESTION_URL"),
            generation_url: url("DESK_GENERATION_URL"),
            ingestion_delay: parse_number(&lookup, "DESK_INGESTION_DELAY_MS")?
                .map_or(defaults.ingestion_delay, Duration::from_millis),
            generation_delay: parse_number(&lookup, "DESK_GENERATION_DELAY_MS")?
                .map_or(defaults.generation_delay, Duration::from_millis),
            http_timeout: parse_number(&lookup, "DESK_HTTP_TIMEOUT_SECS")?
                .map_or(defaults.http_timeout, Duration::from_secs),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}
