//! Video Source configuration.
//!
//! Configuration is loaded from environment variables. Nothing here is
//! secret, so `Debug` is derived.

use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:9001";

/// Default ceiling on the size of a single frame (64 MiB).
pub const DEFAULT_MAX_FRAME_BYTES: u64 = 64 * 1024 * 1024;

/// Default time allowed until response headers are produced.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Default drain period after a shutdown signal.
pub const DEFAULT_DRAIN_SECONDS: u64 = 0;

/// Video Source configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:9001").
    pub bind_address: String,

    /// Largest frame a request may ask for, in bytes.
    pub max_frame_bytes: u64,

    /// Timeout for producing response headers. Streamed bodies are not bounded by it.
    pub request_timeout_seconds: u64,

    /// Seconds to keep serving after a shutdown signal.
    pub drain_seconds: u64,

    /// Emit logs as JSON.
    pub log_json: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid max frame size configuration: {0}")]
    InvalidMaxFrameBytes(String),

    #[error("Invalid request timeout configuration: {0}")]
    InvalidRequestTimeout(String),

    #[error("Invalid drain period configuration: {0}")]
    InvalidDrainPeriod(String),

    #[error("Invalid log format configuration: {0}")]
    InvalidLogFormat(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let max_frame_bytes = if let Some(value_str) = vars.get("VS_MAX_FRAME_BYTES") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidMaxFrameBytes(format!(
                    "VS_MAX_FRAME_BYTES must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidMaxFrameBytes(
                    "VS_MAX_FRAME_BYTES must be greater than 0".to_string(),
                ));
            }

            value
        } else {
            DEFAULT_MAX_FRAME_BYTES
        };

        let request_timeout_seconds =
            if let Some(value_str) = vars.get("VS_REQUEST_TIMEOUT_SECONDS") {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidRequestTimeout(format!(
                        "VS_REQUEST_TIMEOUT_SECONDS must be a valid positive integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value == 0 {
                    return Err(ConfigError::InvalidRequestTimeout(
                        "VS_REQUEST_TIMEOUT_SECONDS must be greater than 0".to_string(),
                    ));
                }

                value
            } else {
                DEFAULT_REQUEST_TIMEOUT_SECONDS
            };

        // Zero is allowed: skip draining entirely
        let drain_seconds = match vars.get("VS_DRAIN_SECONDS") {
            Some(value_str) => value_str.parse::<u64>().map_err(|e| {
                ConfigError::InvalidDrainPeriod(format!(
                    "VS_DRAIN_SECONDS must be a valid non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?,
            None => DEFAULT_DRAIN_SECONDS,
        };

        let log_json = match vars.get("VS_LOG_JSON").map(String::as_str) {
            None | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => {
                return Err(ConfigError::InvalidLogFormat(format!(
                    "VS_LOG_JSON must be 'true' or 'false', got '{}'",
                    other
                )));
            }
        };

        Ok(Config {
            bind_address,
            max_frame_bytes,
            request_timeout_seconds,
            drain_seconds,
            log_json,
        })
    }
}
