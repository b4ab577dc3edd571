//! # Persistence Module
//!
//! Data model and storage for the dashboard configuration. One toml file
//! under the user's config directory holds everything: the selected
//! transport variant, the MQTT broker and topic root, the poll endpoint
//! and UI preferences.
//!
//! ## Error Handling Strategy
//! Follows a fail-safe approach: a missing or corrupt configuration file
//! degrades to defaults with a warning rather than preventing startup. The
//! dashboard must come up even on a freshly imaged device with nothing
//! configured yet.

pub mod config_portal;

pub use config_portal::ConfigPortal;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which transport variant carries control values, chosen per deployment.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportMode {
    /// Publish/subscribe through an MQTT broker.
    #[default]
    Mqtt,
    /// Periodic polling of an HTTP query endpoint.
    Poll,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransportMode::Mqtt => write!(f, "MQTT"),
            TransportMode::Poll => write!(f, "HTTP poll"),
        }
    }
}

/// MQTT broker connection parameters.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct MqttServer {
    /// Broker address as "host" or "host:port".
    pub url: String,
    /// Username for broker authentication; empty means anonymous.
    pub user: String,
    /// Password for broker authentication.
    pub pw: String,
}

impl Default for MqttServer {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:1883".to_string(),
            user: String::new(),
            pw: String::new(),
        }
    }
}

impl fmt::Display for MqttServer {
    /// Formats the server as "user@url", leaving the password out.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.user.is_empty() {
            write!(f, "{}", self.url)
        } else {
            write!(f, "{}@{}", self.user, self.url)
        }
    }
}

/// Settings for the MQTT link.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct MqttSettings {
    #[serde(default)]
    pub server: MqttServer,
    /// Topic prefix all dashboard topics hang off.
    #[serde(default = "default_topic_root")]
    pub topic_root: String,
}

fn default_topic_root() -> String {
    "/opendash".to_string()
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            server: MqttServer::default(),
            topic_root: default_topic_root(),
        }
    }
}

/// Settings for the HTTP poll link.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct PollSettings {
    /// Server base URL the query and command routes hang off.
    pub base_url: String,
    /// Poll interval in milliseconds.
    pub interval_ms: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            interval_ms: 100,
        }
    }
}

/// UI preferences.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct UiSettings {
    /// Target frames per second for UI refresh.
    pub fps: u8,
    /// Start fullscreen (the touchscreen deployment).
    pub fullscreen: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            fps: 30,
            fullscreen: false,
        }
    }
}

/// Complete application configuration.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct DashConfig {
    #[serde(default)]
    pub transport: TransportMode,
    #[serde(default)]
    pub mqtt: MqttSettings,
    #[serde(default)]
    pub poll: PollSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = DashConfig::default();
        config.transport = TransportMode::Poll;
        config.mqtt.server.url = "broker.local:1884".to_string();
        config.poll.interval_ms = 250;

        let text = toml::to_string_pretty(&config).unwrap();
        let reloaded: DashConfig = toml::from_str(&text).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let config: DashConfig = toml::from_str("transport = \"Poll\"\n").unwrap();
        assert_eq!(config.transport, TransportMode::Poll);
        assert_eq!(config.mqtt, MqttSettings::default());
        assert_eq!(config.poll, PollSettings::default());
    }

    #[test]
    fn server_display_hides_the_password() {
        let server = MqttServer {
            url: "broker.local:1883".to_string(),
            user: "dash".to_string(),
            pw: "secret".to_string(),
        };
        let shown = server.to_string();
        assert_eq!(shown, "dash@broker.local:1883");
        assert!(!shown.contains("secret"));
    }
}
