//! # Configuration
//!
//! Startup settings for the debugger: which broker to talk to and which
//! serial numbers stand in for the `gateway_sn` / `device_sn` placeholders.
//!
//! Everything has a built-in default, so the tool runs without any file on
//! disk. When `<config dir>/mqtt-debugger/config.toml` exists it overrides the
//! defaults section by section; missing keys keep their default value.

use crate::mqtt::config::BrokerConfig;
use crate::mqtt::topics::{Identifiers, DEVICE_PLACEHOLDER, GATEWAY_PLACEHOLDER};
use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = "mqtt-debugger";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("broker.channel_capacity must be greater than 0")]
    InvalidChannelCapacity,

    #[error("identifier {0:?} contains a topic placeholder")]
    PlaceholderInIdentifier(String),
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub broker: BrokerConfig,
    pub identifiers: Identifiers,
}

impl Config {
    /// Loads the config from the default location, falling back to defaults
    /// when there is no file.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("Could not determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .wrap_err_with(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.channel_capacity == 0 {
            return Err(ConfigError::InvalidChannelCapacity);
        }
        for id in [&self.identifiers.gateway_sn, &self.identifiers.device_sn] {
            if id.contains(GATEWAY_PLACEHOLDER) || id.contains(DEVICE_PLACEHOLDER) {
                return Err(ConfigError::PlaceholderInIdentifier(id.clone()));
            }
        }
        Ok(())
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.broker.host, "47.245.40.222");
        assert_eq!(config.broker.port, 1883);
        assert_eq!(config.identifiers.gateway_sn, "SN123");
        assert_eq!(config.identifiers.device_sn, "SN456");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let toml = r#"
[broker]
host = "127.0.0.1"

[identifiers]
device_sn = "DOCK-7"
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.broker.host, "127.0.0.1");
        assert_eq!(config.broker.port, 1883);
        assert_eq!(config.broker.keep_alive_secs, 60);
        assert_eq!(config.identifiers.gateway_sn, "SN123");
        assert_eq!(config.identifiers.device_sn, "DOCK-7");
    }

    #[test]
    fn wrong_types_are_rejected() {
        let toml = r#"
[broker]
port = "not a port"
"#;
        assert!(matches!(Config::from_toml(toml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn zero_channel_capacity_is_rejected() {
        let result = Config::from_toml("[broker]\nchannel_capacity = 0");
        assert!(matches!(result, Err(ConfigError::InvalidChannelCapacity)));
    }

    #[test]
    fn identifiers_containing_placeholders_are_rejected() {
        let toml = r#"
[identifiers]
device_sn = "gateway_sn"
"#;
        let result = Config::from_toml(toml);
        assert!(matches!(result, Err(ConfigError::PlaceholderInIdentifier(id)) if id == "gateway_sn"));
    }

    #[test]
    fn invalid_file_is_a_load_error() {
        let path = std::env::temp_dir().join(format!(
            "mqtt-debugger-invalid-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[broker]\nchannel_capacity = 0\n").unwrap();
        let result = Config::load_from(&path);
        std::fs::remove_file(&path).unwrap();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidChannelCapacity)
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("mqtt-debugger-does-not-exist.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
    }
}
