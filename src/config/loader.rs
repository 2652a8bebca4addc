use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },

    #[error("Unknown endpoint '{name}'")]
    UnknownEndpoint { name: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/dashboard-fetch/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("dashboard-fetch").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// A missing file yields `Config::default()`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from(&path)
    }

    /// Loads and validates configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The base URL is http(s)
    /// - Timeouts are non-zero
    /// - Every endpoint path is absolute
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = &self.api.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                message: format!("api.base_url '{}' must start with http:// or https://", base),
            });
        }

        if self.api.timeout_seconds == 0 || self.api.connect_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "api timeouts must be greater than zero".to_string(),
            });
        }

        if let Some((name, path)) = self.endpoints.iter().find(|(_, p)| !p.starts_with('/')) {
            return Err(ConfigError::ValidationError {
                message: format!("Endpoint '{}' path '{}' must start with '/'", name, path),
            });
        }

        Ok(())
    }

    /// Resolve an endpoint name to its path. Literal paths pass through.
    pub fn resolve_endpoint(&self, name_or_path: &str) -> Result<String, ConfigError> {
        if name_or_path.starts_with('/') {
            return Ok(name_or_path.to_string());
        }
        self.endpoints
            .get(name_or_path)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownEndpoint {
                name: name_or_path.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut config = Config::default();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_relative_endpoint_path() {
        let mut config = Config::default();
        config
            .endpoints
            .insert("scan".to_string(), "api/scan".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scan"));
    }

    #[test]
    fn resolves_names_and_literal_paths() {
        let config = Config::default();
        assert_eq!(
            config.resolve_endpoint("plan_today").unwrap(),
            "/api/plan/pre/today"
        );
        assert_eq!(config.resolve_endpoint("/api/other").unwrap(), "/api/other");
        assert!(matches!(
            config.resolve_endpoint("missing"),
            Err(ConfigError::UnknownEndpoint { name }) if name == "missing"
        ));
    }
}
