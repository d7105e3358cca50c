use serde::Deserialize;
use std::fs;
use thiserror::Error;

use super::mqtt_config::{BrokerConfig, ClientConfig, TopicConfig};

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub broker: BrokerConfig,
    pub topics: TopicConfig,
    #[serde(default)]
    pub clients: ClientConfig,
}

impl AppConfig {
    pub fn load(file_name: &str) -> Result<AppConfig, ConfigError> {
        let content = fs::read_to_string(file_name)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<AppConfig, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("broker.host", self.broker.host.as_str()),
            ("broker.client_id", self.broker.client_id.as_str()),
            ("topics.telemetry", self.topics.telemetry.as_str()),
            ("topics.control", self.topics.control.as_str()),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("{name} must not be empty")));
        }
        if self.broker.port == 0 {
            return Err(ConfigError::Invalid("broker.port must not be 0".into()));
        }
        if self.broker.keep_alive_secs == 0 || self.broker.connection_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "broker.keep_alive_secs and broker.connection_timeout_secs must be positive".into(),
            ));
        }
        if self.clients.buffer == 0 {
            return Err(ConfigError::Invalid("clients.buffer must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Could not parse TOML config: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
