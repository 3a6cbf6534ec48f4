//! # Client Configuration Module
//!
//! This module handles loading configuration for the Kickoff booking client.
//! Values come from environment variables, with defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `KICKOFF_API_URL`: Base URL of the booking backend (default: "http://localhost:8080/api")
//! - `KICKOFF_API_TOKEN`: Session token sent as a bearer token (optional)
//! - `KICKOFF_REQUEST_TIMEOUT_MS`: Timeout applied to every backend call (default: 10000)
//! - `LOG_LEVEL`: Logging level (default: "info")

use std::{env, time::Duration};

use eyre::{Result, WrapErr, eyre};
use tracing::Level;

const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Configuration for talking to the booking backend
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use kickoff_client::config::ClientConfig;
///
/// fn example() -> Result<()> {
///     let config = ClientConfig::from_env()?;
///     println!("Using backend at {}", config.api_url);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend, without a trailing slash
    pub api_url: String,

    /// Session token for authenticated endpoints
    pub api_token: Option<String>,

    /// Per-call timeout
    pub request_timeout: Duration,

    /// Log level for the application
    pub log_level: Level,
}

impl ClientConfig {
    /// Creates a new ClientConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `KICKOFF_REQUEST_TIMEOUT_MS` is not a positive integer
    /// - `KICKOFF_API_URL` is set but blank
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Backend settings
        let api_url = lookup("KICKOFF_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = api_url.trim().trim_end_matches('/').to_string();
        if api_url.is_empty() {
            return Err(eyre!("KICKOFF_API_URL must not be blank"));
        }

        let api_token = lookup("KICKOFF_API_TOKEN")
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        // Timeout settings
        let timeout_ms = match lookup("KICKOFF_REQUEST_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .wrap_err("Invalid KICKOFF_REQUEST_TIMEOUT_MS value")?,
            None => DEFAULT_TIMEOUT_MS,
        };
        if timeout_ms == 0 {
            return Err(eyre!("KICKOFF_REQUEST_TIMEOUT_MS must be greater than zero"));
        }

        // Logging settings
        let log_level = match lookup("LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .to_lowercase()
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        Ok(Self {
            api_url,
            api_token,
            request_timeout: Duration::from_millis(timeout_ms),
            log_level,
        })
    }
}
