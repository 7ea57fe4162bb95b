//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::agents::AiBackendConfig;
use crate::calculate::{InactivityPolicy, MAX_PENALTY_POINTS};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Statistics tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Days without a match before the inactivity penalty starts
    #[serde(default = "default_grace_days")]
    pub grace_days: u32,

    #[serde(default = "default_points_per_week")]
    pub points_per_week: u32,

    /// Penalty ceiling, at most 100
    #[serde(default = "default_max_penalty")]
    pub max_penalty: u32,

    /// Matches included in the daily summary prompt
    #[serde(default = "default_summary_recent_matches")]
    pub summary_recent_matches: u32,
}

fn default_grace_days() -> u32 {
    InactivityPolicy::default().grace_days
}

fn default_points_per_week() -> u32 {
    InactivityPolicy::default().points_per_week
}

fn default_max_penalty() -> u32 {
    InactivityPolicy::default().max_penalty
}

fn default_summary_recent_matches() -> u32 {
    10
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            grace_days: default_grace_days(),
            points_per_week: default_points_per_week(),
            max_penalty: default_max_penalty(),
            summary_recent_matches: default_summary_recent_matches(),
        }
    }
}

impl StatsConfig {
    pub fn inactivity_policy(&self) -> InactivityPolicy {
        InactivityPolicy {
            grace_days: self.grace_days,
            points_per_week: self.points_per_week,
            max_penalty: self.max_penalty,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub ai: AiBackendConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub stats: StatsConfig,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./data/league.db")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_level: default_log_level(),
            ai: AiBackendConfig::default(),
            server: ServerConfig::default(),
            stats: StatsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ai.timeout_seconds() == 0 {
            return Err(ConfigError::ValidationError(
                "AI timeout must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.stats.max_penalty > MAX_PENALTY_POINTS {
            return Err(ConfigError::ValidationError(format!(
                "max_penalty must be at most {}",
                MAX_PENALTY_POINTS
            )));
        }

        Ok(())
    }
}
