//! Application configuration management
//!
//! This module handles loading and validating configuration from environment
//! variables. All configuration is loaded at startup and validated before the
//! application runs.

use std::env;
use std::sync::LazyLock;

use crate::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_CATALOG_URL, DEFAULT_ENGINE_URL, DEFAULT_UPSTREAM_TIMEOUT_SECS,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub rust_log: String,
}

/// URLs of the two services this proxy relays to, plus the shared timeout.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub engine_url: String,
    pub catalog_url: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            upstream: UpstreamConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: env::var("PROXY_BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl UpstreamConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            engine_url: env::var("PROXY_ENGINE_URL")
                .unwrap_or_else(|_| DEFAULT_ENGINE_URL.to_string()),
            catalog_url: env::var("PROXY_CATALOG_URL")
                .unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string()),
            timeout_secs: env::var("PROXY_UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_TIMEOUT_SECS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PROXY_UPSTREAM_TIMEOUT_SECS".to_string()))?,
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
