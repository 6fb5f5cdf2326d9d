//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::data::{DatasetKind, DatasetPaths, COMPLETED_STAGE};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dataset file locations
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_restaurant_file")]
    pub restaurant_file: String,

    #[serde(default = "default_construction_file")]
    pub construction_file: String,

    #[serde(default = "default_real_estate_file")]
    pub real_estate_file: String,
}

fn default_data_dir() -> String {
    ".".to_string()
}

fn default_restaurant_file() -> String {
    DatasetKind::Restaurant.default_file_name().to_string()
}

fn default_construction_file() -> String {
    DatasetKind::Construction.default_file_name().to_string()
}

fn default_real_estate_file() -> String {
    DatasetKind::RealEstate.default_file_name().to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            restaurant_file: default_restaurant_file(),
            construction_file: default_construction_file(),
            real_estate_file: default_real_estate_file(),
        }
    }
}

impl DataConfig {
    /// Resolve file names against `data_dir` (absolute file names win)
    pub fn paths(&self) -> DatasetPaths {
        let dir = Path::new(&self.data_dir);
        DatasetPaths {
            restaurant: dir.join(&self.restaurant_file),
            construction: dir.join(&self.construction_file),
            real_estate: dir.join(&self.real_estate_file),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_max_sessions() -> usize {
    256
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Dashboard behavior
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_title")]
    pub title: String,

    /// Fixed reference date for job aging; today when unset
    #[serde(default)]
    pub as_of: Option<NaiveDate>,

    /// Make the real-estate stage, agent and lead source charts follow the
    /// stage filter instead of always showing every listing
    #[serde(default)]
    pub real_estate_charts_follow_filter: bool,

    #[serde(default = "default_completed_stage")]
    pub completed_stage: String,
}

fn default_title() -> String {
    "SMB Analytics Demo".to_string()
}

fn default_completed_stage() -> String {
    COMPLETED_STAGE.to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            as_of: None,
            real_estate_charts_follow_filter: false,
            completed_stage: default_completed_stage(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the first default location that exists, or environment only
    ///
    /// A config file that exists but cannot be loaded is an error, not a
    /// reason to fall back to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_with_env(&path),
            None => Self::from_env(),
        }
    }

    /// First existing file among the default locations
    pub fn default_path() -> Option<PathBuf> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("smb-analytics").join("config.toml")),
            Some(PathBuf::from("/etc/smb-analytics/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        config_paths.into_iter().flatten().find(|path| path.exists())
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Reject values the rest of the program cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.completed_stage.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "dashboard.completed_stage cannot be empty".to_string(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        if self.api.max_sessions == 0 {
            return Err(ConfigError::Invalid(
                "api.max_sessions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup
    fn apply_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Data overrides
        if let Some(data_dir) = var("SMB_ANALYTICS_DATA_DIR") {
            self.data.data_dir = data_dir;
        }

        // API overrides
        if let Some(host) = var("SMB_ANALYTICS_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("SMB_ANALYTICS_API_PORT") {
            self.api.port = port.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "SMB_ANALYTICS_API_PORT must be a port number, got \"{}\"",
                    port
                ))
            })?;
        }

        // Dashboard overrides
        if let Some(as_of) = var("SMB_ANALYTICS_AS_OF") {
            let date = as_of.trim().parse::<NaiveDate>().map_err(|e| {
                ConfigError::Invalid(format!(
                    "SMB_ANALYTICS_AS_OF must be YYYY-MM-DD, got \"{}\": {}",
                    as_of, e
                ))
            })?;
            self.dashboard.as_of = Some(date);
        }

        // Logging overrides
        if let Some(level) = var("SMB_ANALYTICS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("SMB_ANALYTICS_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# SMB Analytics Configuration
#
# Environment variables override these settings:
# - SMB_ANALYTICS_DATA_DIR
# - SMB_ANALYTICS_API_HOST
# - SMB_ANALYTICS_API_PORT
# - SMB_ANALYTICS_AS_OF
# - SMB_ANALYTICS_LOG_LEVEL
# - SMB_ANALYTICS_LOG_FORMAT

[data]
# Directory holding the dataset files
data_dir = "."

# Dataset file names (absolute paths are used as-is)
restaurant_file = "Restaurant_Sales_Data.csv"
construction_file = "Construction_Jobs_Data.csv"
real_estate_file = "Real_Estate_Listings_Data.csv"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8501

# Allowed CORS origins (empty allows any origin)
cors_origins = []

# Maximum concurrent WebSocket sessions
max_sessions = 256

[dashboard]
# Page title
title = "SMB Analytics Demo"

# Fixed reference date for active job aging (defaults to today)
# as_of = "2024-06-30"

# Let the real-estate stage, agent and lead source charts follow the
# stage filter (by default they always cover every listing)
real_estate_charts_follow_filter = false

# Stage label that marks a construction job as completed
completed_stage = "Completed"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8501);
        assert_eq!(config.dashboard.completed_stage, "Completed");
        assert!(!config.dashboard.real_estate_charts_follow_filter);
        assert_eq!(config.dashboard.as_of, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
[data]
data_dir = "/srv/data"

[dashboard]
as_of = "2024-06-30"
"#,
        )
        .unwrap();
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(
            config.data.paths().construction,
            PathBuf::from("/srv/data/Construction_Jobs_Data.csv")
        );
        assert_eq!(
            config.dashboard.as_of,
            NaiveDate::from_ymd_opt(2024, 6, 30)
        );
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nformat = \"xml\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));

        std::fs::write(&path, "[api\nport = 1").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));
    }

    fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = Config::default();
        config
            .apply_overrides(vars(&[
                ("SMB_ANALYTICS_API_PORT", "9000"),
                ("SMB_ANALYTICS_AS_OF", "2024-04-30"),
                ("SMB_ANALYTICS_LOG_FORMAT", "json"),
            ]))
            .unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.dashboard.as_of, NaiveDate::from_ymd_opt(2024, 4, 30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overridden_values_are_validated() {
        let mut config = Config::default();
        config
            .apply_overrides(vars(&[("SMB_ANALYTICS_LOG_FORMAT", "xml")]))
            .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_override_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(vars(&[("SMB_ANALYTICS_API_PORT", "notaport")]))
            .unwrap_err();
        assert!(err.to_string().contains("SMB_ANALYTICS_API_PORT"));

        let mut config = Config::default();
        assert!(config
            .apply_overrides(vars(&[("SMB_ANALYTICS_AS_OF", "tomorrow")]))
            .is_err());
    }

    #[test]
    fn test_api_addr() {
        assert_eq!(ApiConfig::new("127.0.0.1", 9000).addr(), "127.0.0.1:9000");
    }
}
