//! Server configuration loaded from environment variables

use std::env;
use tempguard_core::DetectorConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,

    /// Public port for HTTP traffic
    pub port: u16,

    /// Detector settings (data directory, refresh interval, timeouts)
    pub detectors: DetectorConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            detectors: DetectorConfig::from_env()?,
        })
    }

    /// Socket address string to bind (e.g. "0.0.0.0:3000")
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error(transparent)]
    Detector(#[from] tempguard_core::ConfigError),
}
