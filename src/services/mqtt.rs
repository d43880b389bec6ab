//! MQTT placeholder client.
//!
//! Records calls with tracing and keeps published messages in memory. There is
//! no network I/O.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::models::MqttMessage;

/// Default broker host.
pub const DEFAULT_BROKER_URL: &str = "localhost";

/// Default broker port.
pub const DEFAULT_BROKER_PORT: u16 = 1883;

#[derive(Debug, Clone, Default)]
pub struct MqttClient {
    messages: Arc<Mutex<Vec<MqttMessage>>>,
}

impl MqttClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, broker_url: &str, port: u16) {
        info!("Connecting to MQTT broker at {}:{}", broker_url, port);
    }

    /// Record a message in the in-memory log.
    pub fn publish(&self, topic: &str, payload: &str) -> MqttMessage {
        info!("Publish to {}: {}", topic, payload);
        let message = MqttMessage {
            topic: topic.to_string(),
            payload: payload.to_string(),
        };
        self.lock().push(message.clone());
        message
    }

    pub fn subscribe(&self, topic: &str) {
        info!("Subscribing to {}", topic);
    }

    pub fn loop_start(&self) {
        info!("MQTT loop started");
    }

    /// Published messages in publication order.
    pub fn messages(&self) -> Vec<MqttMessage> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<MqttMessage>> {
        // Recover the log if a holder panicked
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_keeps_order() {
        let client = MqttClient::new();
        client.connect(DEFAULT_BROKER_URL, DEFAULT_BROKER_PORT);
        client.subscribe("sensors/#");
        client.loop_start();

        client.publish("sensors/a", "1");
        client.publish("sensors/b", "2");

        let topics: Vec<_> = client.messages().into_iter().map(|m| m.topic).collect();
        assert_eq!(topics, vec!["sensors/a", "sensors/b"]);
    }

    #[test]
    fn test_clones_share_log() {
        let client = MqttClient::new();
        let other = client.clone();
        other.publish("t", "p");
        assert_eq!(client.messages().len(), 1);
    }
}
