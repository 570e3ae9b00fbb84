//! Engine Configuration Module
//!
//! Provides configuration loading for the pool engine service.
//! Supports loading from TOML files with environment-specific overrides
//! and `TORQ_`-prefixed environment variables.

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use torq_types::HolderId;
use tracing::{debug, info, warn};

/// Default location of the base configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/engine.toml";

/// Directory holding `<environment>.toml` override files
pub const ENVIRONMENTS_DIR: &str = "config/environments";

/// Main engine configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EngineConfig {
    /// Engine identity and custody settings
    pub engine: EngineSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Notification delivery settings
    #[serde(default)]
    pub events: EventSettings,
}

/// Engine identity and custody settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EngineSettings {
    /// Account that holds pooled reserves on the asset ledger
    pub vault: HolderId,
}

/// Logging settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON-formatted log lines
    pub json: bool,
}

/// Notification delivery settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EventSettings {
    /// Bounded capacity of the event channel
    pub channel_capacity: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl EngineConfig {
    /// Load configuration from files with environment overrides
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let base = base_path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));

        let mut builder = Config::builder().add_source(File::from(base).required(true));

        // Add environment-specific overrides if specified
        if let Some(env) = environment {
            let env_file = PathBuf::from(ENVIRONMENTS_DIR).join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        // Override with environment variables, e.g. TORQ_EVENTS__CHANNEL_CAPACITY=64
        builder = builder.add_source(
            Environment::with_prefix("TORQ")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: EngineConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        debug!(vault = %config.engine.vault, "Engine configuration loaded");
        Ok(config)
    }

    /// Parse a configuration from TOML text without touching the filesystem
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(raw).context("Failed to parse TOML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.engine.vault.is_zero() {
            bail!("engine.vault must not be the zero address");
        }
        if self.events.channel_capacity == 0 {
            bail!("events.channel_capacity must be greater than zero");
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            bail!(
                "logging.level '{}' is not one of {:?}",
                self.logging.level,
                LOG_LEVELS
            );
        }
        Ok(())
    }
}

/// Convenience function to load configuration with defaults
pub fn load_config(path: Option<&Path>, environment: Option<&str>) -> Result<EngineConfig> {
    EngineConfig::load(path, environment)
}
