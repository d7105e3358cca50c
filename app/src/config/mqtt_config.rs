use std::time::Duration;

use rumqttc::{MqttOptions, NetworkOptions};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    pub keep_alive_secs: u64,
    pub connection_timeout_secs: u64,
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TopicConfig {
    pub telemetry: String,
    pub control: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ClientConfig {
    /// Pending status events per live client before it counts as lagging.
    #[serde(default = "default_client_buffer")]
    pub buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            buffer: default_client_buffer(),
        }
    }
}

fn default_client_id() -> String {
    "moisture-bridge".into()
}
fn default_reconnect_delay_ms() -> u64 {
    1000
}
fn default_client_buffer() -> usize {
    16
}

impl BrokerConfig {
    pub fn endpoint(&self) -> String {
        format!("mqtt://{}:{}", self.host, self.port)
    }

    pub fn options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(&self.client_id, &self.host, self.port);
        options
            .set_keep_alive(Duration::from_secs(self.keep_alive_secs))
            .set_clean_session(true);
        options
    }

    pub fn network_options(&self) -> NetworkOptions {
        let mut options = NetworkOptions::new();
        options.set_connection_timeout(self.connection_timeout_secs);
        options
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}
