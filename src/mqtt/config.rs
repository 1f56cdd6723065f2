use rumqttc::MqttOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Broker connection settings. No credentials and no TLS.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub keep_alive_secs: u64,
    /// Capacity of the outgoing queue and of the rumqttc request channel
    pub channel_capacity: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "47.245.40.222".to_string(),
            port: 1883,
            client_id: "mqtt-debugger".to_string(),
            keep_alive_secs: 60,
            channel_capacity: 32,
        }
    }
}

impl BrokerConfig {
    pub fn mqtt_options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(self.client_id.clone(), self.host.clone(), self.port);
        options.set_keep_alive(Duration::from_secs(self.keep_alive_secs));
        options
    }
}

impl fmt::Display for BrokerConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
