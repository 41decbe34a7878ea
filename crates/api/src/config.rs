//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use client::ClientConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DISCOUNT_API_URL`: GraphQL endpoint (default: `"http://localhost:4000/graphql"`)
/// - `DISCOUNT_TIMEOUT_MS`: backend call bound in milliseconds (default: `5000`)
/// - `DISCOUNT_STORAGE_PATH`: applied discount file (default: `"data/applied_discount.json"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub discount_api_url: String,
    pub discount_timeout: Duration,
    pub storage_path: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    ///
    /// Unparseable numbers fall back to their defaults as well.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            discount_api_url: std::env::var("DISCOUNT_API_URL")
                .unwrap_or(defaults.discount_api_url),
            discount_timeout: std::env::var("DISCOUNT_TIMEOUT_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.discount_timeout),
            storage_path: std::env::var_os("DISCOUNT_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Backend settings for the discount clients.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.discount_api_url.clone()).with_timeout(self.discount_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        let client = ClientConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            discount_api_url: client.endpoint,
            discount_timeout: client.timeout,
            storage_path: PathBuf::from("data/applied_discount.json"),
        }
    }
}
