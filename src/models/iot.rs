//! IoT models: registered devices, ingested events, and MQTT placeholder messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_non_blank, ValidationError};

/// A registered IoT device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IotDevice {
    pub id: String,
    pub device_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IotDeviceInput {
    pub device_id: String,
}

impl IotDeviceInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("device_id", &self.device_id)
    }
}

/// A data point pushed by an external vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IotEvent {
    pub id: String,
    pub device_id: String,
    /// Arbitrary vendor JSON.
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IotDataRequest {
    pub device_id: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl IotDataRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("device_id", &self.device_id)
    }
}

/// A message published through the MQTT placeholder client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MqttMessage {
    pub topic: String,
    pub payload: String,
}

impl MqttMessage {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("topic", &self.topic)
    }
}
