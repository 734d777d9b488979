//! Application configuration, read from an optional TOML file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::store::TransitionDelays;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where persisted collections live. Kept in memory when absent.
    pub data_dir: Option<PathBuf>,
    /// Mailbox size of every actor.
    pub buffer_size: usize,
    /// Delay before a placed order is accepted.
    pub accept_delay_ms: u64,
    /// Delay before a placed order is ready, counted from placement.
    pub ready_delay_ms: u64,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            buffer_size: 32,
            accept_delay_ms: 4000,
            ready_delay_ms: 9000,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults when `path` is `None` or the file does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Io { path: path.to_path_buf(), source }),
        };
        let config = Self::from_toml(&content)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::Invalid("buffer_size must be at least 1".into()));
        }
        if self.ready_delay_ms < self.accept_delay_ms {
            return Err(ConfigError::Invalid(format!(
                "ready_delay_ms ({}) must not be shorter than accept_delay_ms ({})",
                self.ready_delay_ms, self.accept_delay_ms
            )));
        }
        Ok(())
    }

    pub fn transition_delays(&self) -> TransitionDelays {
        TransitionDelays {
            accept: Duration::from_millis(self.accept_delay_ms),
            ready: Duration::from_millis(self.ready_delay_ms),
        }
    }
}
