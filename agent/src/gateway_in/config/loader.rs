use std::path::{Path, PathBuf};
use thiserror::Error;
use trading_core::TimestampError;

use super::types::AgentConfigFile;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error("Invalid config: {0}")]
    Offset(#[from] TimestampError),
}

/// Load agent configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AgentConfigFile, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<AgentConfigFile, ConfigError> {
    let config: AgentConfigFile = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<AgentConfigFile, ConfigError> {
    let default_config = include_str!("lightning_config.json");
    load_config_from_str(default_config)
}

impl AgentConfigFile {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.product_code.is_empty() {
            return Err(ConfigError::Invalid("product_code is empty".to_string()));
        }
        if self.realtime.watchdog_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "realtime.watchdog_interval_ms must be positive".to_string(),
            ));
        }
        if self.realtime.max_executions == 0 {
            return Err(ConfigError::Invalid(
                "realtime.max_executions must be positive".to_string(),
            ));
        }
        if self.realtime.event_buffer == 0 {
            return Err(ConfigError::Invalid(
                "realtime.event_buffer must be positive".to_string(),
            ));
        }
        trading_core::ExchangeTime::new(self.realtime.utc_offset_secs)?;
        Ok(())
    }
}
