//! HTTP Server Configuration
//!
//! Configuration for the HTTP server including host, port, pagination,
//! storage backend and CORS settings.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Page size used when a list request does not ask for one (default: 30)
    #[serde(default = "default_paginator_limit")]
    pub paginator_limit_default: usize,

    /// Per-request timeout in seconds (default: 5)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// PostgreSQL connection string; courses are kept in memory when unset
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_paginator_limit() -> usize {
    30
}

fn default_request_timeout_secs() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            paginator_limit_default: default_paginator_limit(),
            request_timeout_secs: default_request_timeout_secs(),
            cors_origins: Vec::new(),
            database_url: None,
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Load a JSON config file; missing keys take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paginator_limit_default == 0 {
            return Err(ConfigError::Invalid(
                "paginator_limit_default must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
