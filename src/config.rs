//! Configuration module
//!
//! Reads TOML from `~/.config/poste-map/config.toml` (or the path in
//! `POSTE_MAP_CONFIG`). Every section has defaults so a missing or
//! partial file still yields a runnable configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::PageLimits;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub query: QueryConfig,
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests during shutdown
    pub shutdown_timeout: u64,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            shutdown_timeout: 30,
        }
    }
}

/// Database settings (any SeaORM connection URL)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./postes.db?mode=rwc".to_string(),
        }
    }
}

/// Bounding-box query limits and budgets
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Page size when the caller sends none
    pub default_limit: u32,
    /// Lower clamp for the page size
    pub min_limit: u32,
    /// Upper clamp for the page size
    pub max_limit: u32,
    /// Maximum bounding-box area in square degrees
    pub max_bbox_area: f64,
    /// Per-statement time budget; exceeding it surfaces as 504
    pub statement_timeout_ms: u64,
    /// `s-maxage` advertised on successful responses
    pub cache_ttl_secs: u32,
}

impl QueryConfig {
    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_limit: self.default_limit,
            min_limit: self.min_limit,
            max_limit: self.max_limit,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: 5000,
            min_limit: 100,
            max_limit: 20000,
            max_bbox_area: 0.30,
            statement_timeout_ms: 8000,
            cache_ttl_secs: 30,
        }
    }
}

/// Fetch-loop client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Pacing delay between successive page requests (not a retry policy)
    pub page_delay_ms: u64,
    /// Page size the fetch loop asks for
    pub page_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: 150,
            page_limit: 5000,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Default config file location under the user config dir
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("poste-map")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.query.default_limit, 5000);
        assert_eq!(cfg.query.min_limit, 100);
        assert_eq!(cfg.query.max_limit, 20000);
        assert!((cfg.query.max_bbox_area - 0.30).abs() < f64::EPSILON);
        assert_eq!(cfg.query.statement_timeout_ms, 8000);
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn partial_toml_keeps_section_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [query]
            max_bbox_area = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert!((cfg.query.max_bbox_area - 0.5).abs() < f64::EPSILON);
        assert_eq!(cfg.query.default_limit, 5000);
        assert_eq!(cfg.client.page_delay_ms, 150);
    }
}
