//! Configuration management for Spyglass.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// This is loaded from `~/.config/spyglass/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
/// Secrets never live here; API keys come from the credential store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scanning behavior settings
    pub scanning: ScanningConfig,
    /// Module selection settings
    pub modules: ModulesConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `SPYGLASS_MAX_CONCURRENT`: Override the global request ceiling
    /// - `SPYGLASS_MODULE_TIMEOUT_FLOOR_SECS`: Override the module time budget floor
    /// - `SPYGLASS_CLIENT_TIMEOUT_SECS`: Override the HTTP client timeout
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        // Override from environment
        if let Ok(val) = std::env::var("SPYGLASS_MAX_CONCURRENT") {
            if let Ok(max) = val.parse() {
                config.scanning.max_concurrent_requests = max;
                tracing::debug!("Override max_concurrent_requests from env: {}", max);
            }
        }

        if let Ok(val) = std::env::var("SPYGLASS_MODULE_TIMEOUT_FLOOR_SECS") {
            if let Ok(secs) = val.parse() {
                config.scanning.module_timeout_floor_secs = secs;
                tracing::debug!("Override module_timeout_floor_secs from env: {}", secs);
            }
        }

        if let Ok(val) = std::env::var("SPYGLASS_CLIENT_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.scanning.client_timeout_secs = secs;
                tracing::debug!("Override client_timeout_secs from env: {}", secs);
            }
        }

        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/spyglass/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "spyglass", "spyglass").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/spyglass`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "spyglass", "spyglass").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

/// Scanning behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Global ceiling on in-flight module requests
    pub max_concurrent_requests: usize,
    /// HTTP connection pool idle cap per host
    pub max_per_host: usize,
    /// Minimum per-module time budget in seconds.
    ///
    /// A module declaring a smaller `timeout_secs` is raised to this
    /// floor; the budget must admit the HTTP helper's rate-limit retries.
    pub module_timeout_floor_secs: u64,
    /// HTTP client request timeout in seconds
    pub client_timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 100,
            max_per_host: 20,
            module_timeout_floor_secs: 25,
            client_timeout_secs: 30,
            user_agent: "Spyglass/0.1.0 (+https://github.com/spyglass-osint/spyglass)"
                .to_string(),
        }
    }
}

/// Module selection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    /// Module names to exclude from scans
    pub disabled: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scanning.max_concurrent_requests, 100);
        assert_eq!(config.scanning.max_per_host, 20);
        assert_eq!(config.scanning.module_timeout_floor_secs, 25);
        assert_eq!(config.scanning.client_timeout_secs, 30);
        assert!(config.modules.disabled.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[scanning]"));
        assert!(toml_str.contains("[modules]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(
            parsed.scanning.max_concurrent_requests,
            config.scanning.max_concurrent_requests
        );
        assert_eq!(parsed.scanning.user_agent, config.scanning.user_agent);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
            [scanning]
            max_concurrent_requests = 10
        "#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.scanning.max_concurrent_requests, 10);
        // Unspecified fields fall back to defaults
        assert_eq!(config.scanning.module_timeout_floor_secs, 25);
        assert_eq!(config.scanning.max_per_host, 20);
    }

    #[test]
    fn test_disabled_modules_roundtrip() {
        let toml_str = r#"
            [modules]
            disabled = ["wigle", "hibp"]
        "#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse modules config");
        assert_eq!(config.modules.disabled, vec!["wigle", "hibp"]);
    }
}
