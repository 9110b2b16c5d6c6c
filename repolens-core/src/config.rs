//! Configuration management
//!
//! The client reads its settings once at startup: an optional TOML file,
//! overridden by environment variables, falling back to built-in defaults.

use crate::error::{ErrorContext, LensError, LensResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fallback analysis service base URL used when nothing is configured
pub const DEFAULT_SERVICE_URL: &str = "https://localhost:8000";

/// Environment variable that overrides the analysis service base URL
pub const SERVICE_URL_ENV: &str = "REPOLENS_API_URL";

/// Top-level client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    pub service: ServiceSettings,
}

/// Settings for the remote analysis service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Base URL of the analysis service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string sent with every request
    pub user_agent: String,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            service: ServiceSettings::default(),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVICE_URL.to_string(),
            timeout_seconds: 30,
            user_agent: "repolens/0.1".to_string(),
        }
    }
}

impl LensConfig {
    /// Load configuration with the standard precedence: explicit file, then
    /// the platform config directory, then defaults; the environment
    /// override is applied last in every case.
    pub fn load(explicit_path: Option<&Path>) -> LensResult<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        if let Ok(url) = std::env::var(SERVICE_URL_ENV) {
            if !url.trim().is_empty() {
                config.service.base_url = url.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Default config file location under the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("repolens").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> LensResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LensError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: LensConfig = toml::from_str(&content).map_err(|e| LensError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> LensResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| LensError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| LensError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> LensResult<()> {
        if url::Url::parse(&self.service.base_url).is_err() {
            return Err(LensError::Config {
                message: format!(
                    "Service base URL is not a valid absolute URL: {}",
                    self.service.base_url
                ),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set service.base_url to something like https://localhost:8000"),
            });
        }

        if self.service.timeout_seconds == 0 {
            return Err(LensError::Config {
                message: "Service timeout must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set service.timeout_seconds to a positive value"),
            });
        }

        Ok(())
    }
}
