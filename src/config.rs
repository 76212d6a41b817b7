//! # Engine Configuration
//!
//! Sources, lowest priority first: built-in defaults, a TOML file, then environment
//! variables (`APPNEST_MAX_NESTING_DEPTH`, `APPNEST_STORE_BUFFER`). `RUST_LOG`, when set,
//! replaces `logging.filter` at subscriber setup.
//!
//! ```toml
//! max_nesting_depth = 10
//! store_buffer = 32
//!
//! [logging]
//! filter = "info,appnest=debug"
//! compact = true
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_MAX_NESTING_DEPTH: &str = "APPNEST_MAX_NESTING_DEPTH";
pub const ENV_STORE_BUFFER: &str = "APPNEST_STORE_BUFFER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of `.`-separated segments in a child's public name.
    pub max_nesting_depth: usize,
    /// Request channel capacity of each object store.
    pub store_buffer: usize,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive string.
    pub filter: String,
    pub compact: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 10,
            store_buffer: 32,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            compact: true,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, then applies environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: Self = toml::from_str(&raw)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Applies overrides read through `var`.
    pub fn apply_env_from<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = var(ENV_MAX_NESTING_DEPTH) {
            self.max_nesting_depth = parse_env(ENV_MAX_NESTING_DEPTH, &raw)?;
        }
        if let Some(raw) = var(ENV_STORE_BUFFER) {
            self.store_buffer = parse_env(ENV_STORE_BUFFER, &raw)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_nesting_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_nesting_depth must be at least 1".to_string(),
            ));
        }
        if self.store_buffer == 0 {
            return Err(ConfigError::Invalid(
                "store_buffer must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env(name: &str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{name}={raw:?} is not a positive integer")))
}
