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
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/imageloader/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("imageloader").join("config.toml")
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

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
    /// - Timeouts are non-zero
    /// - The body limit is non-zero
    /// - The probe address has a port when connectivity checks are enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "fetch.timeout_seconds must be greater than zero".to_string(),
            });
        }

        if self.fetch.connect_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "fetch.connect_timeout_seconds must be greater than zero".to_string(),
            });
        }

        if self.fetch.max_bytes == 0 {
            return Err(ConfigError::ValidationError {
                message: "fetch.max_bytes must be greater than zero".to_string(),
            });
        }

        if self.connectivity.enabled {
            let addr = &self.connectivity.probe_addr;
            let has_port = addr
                .rsplit_once(':')
                .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
            if !has_port {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "connectivity.probe_addr '{}' must be in host:port form",
                        addr
                    ),
                });
            }

            if self.connectivity.poll_interval_seconds == 0 {
                return Err(ConfigError::ValidationError {
                    message: "connectivity.poll_interval_seconds must be greater than zero"
                        .to_string(),
                });
            }
        }

        Ok(())
    }
}
