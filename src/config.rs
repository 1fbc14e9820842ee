//! Fixed-key configuration (§6): MQTT endpoint, device/uhost identity, and
//! which transport flavor (`mqtt` or `umqtt`) to speak.

use crate::error::ConnectivityError;
use serde::{Deserialize, Serialize};

/// MQTT broker connection parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MqttConfig {
    /// Broker host, e.g. `"mqtt.example.com:1883"`.
    pub host: String,
    /// Username presented at connect.
    pub user: String,
    /// Password presented at connect.
    pub pass: String,
    /// Seconds to wait between reconnect attempts.
    pub reconnect_time: u64,
}

/// Which MQTT flavor the Uhost connection should speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Standard MQTT 3.1.1, via [`crate::connectivity::mqtt_transport`].
    Mqtt,
    /// The reduced "umqtt" variant used on constrained links.
    Umqtt,
}

/// UTIM's static configuration, loaded once at construction.
///
/// `utim_name` and `uhost_name` are hex strings on this boundary (matching
/// `ubinascii.unhexlify` call sites in the source configuration) and are
/// decoded via [`Config::utim_name_bytes`]/[`Config::uhost_name_bytes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Broker connection parameters.
    pub mqtt: MqttConfig,
    /// This agent's identity, as a hex string.
    pub utim_name: String,
    /// The statically-provisioned SRP password, as a hex string (§4.6 —
    /// `6b6579` ("key") in the source, an obvious placeholder; real
    /// provisioning is out of scope here).
    pub master_key: String,
    /// The Uhost peer's identity, as a hex string.
    pub uhost_name: String,
    /// Transport flavor to speak to Uhost.
    pub protocol: Protocol,
}

impl Config {
    /// Hex-decodes [`Config::utim_name`].
    pub fn utim_name_bytes(&self) -> Result<Vec<u8>, ConnectivityError> {
        hex::decode(&self.utim_name).map_err(|_| ConnectivityError::ConnectivityConfigError)
    }

    /// Hex-decodes [`Config::master_key`]. Falls back to the raw UTF-8
    /// bytes of the configured string if it is not valid hex, so a
    /// plaintext placeholder like `"key"` still works the way the source's
    /// hardcoded `config.py` literal does.
    pub fn master_key_bytes(&self) -> Vec<u8> {
        hex::decode(&self.master_key).unwrap_or_else(|_| self.master_key.clone().into_bytes())
    }

    /// Hex-decodes [`Config::uhost_name`].
    pub fn uhost_name_bytes(&self) -> Result<Vec<u8>, ConnectivityError> {
        hex::decode(&self.uhost_name).map_err(|_| ConnectivityError::ConnectivityConfigError)
    }

    /// Parses a [`Config`] from its JSON representation.
    pub fn from_json(text: &str) -> Result<Self, ConnectivityError> {
        serde_json::from_str(text).map_err(|_| ConnectivityError::ConnectivityConfigError)
    }
}
