use async_trait::async_trait;
use domain::event::{DomainEvent, EventPublisher};

use crate::messaging::mqtt_client::MqttClient;

/// Publishes domain events as JSON on a per-event-type subtopic, e.g.
/// `yard/events/VehicleZoneChanged`. Best-effort: failures are logged
/// and never propagated to the committing caller.
pub struct MqttEventPublisher {
    client: MqttClient,
    base_topic: String,
}

impl MqttEventPublisher {
    pub fn new(client: MqttClient, base_topic: String) -> Self {
        Self { client, base_topic }
    }
}

#[async_trait]
impl EventPublisher for MqttEventPublisher {
    async fn publish(
        &self,
        event: DomainEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let topic = format!("{}/{}", self.base_topic, event.event_type());
        let payload = serde_json::to_vec(&event)?;

        if let Err(e) = self.client.publish(&topic, &payload).await {
            tracing::error!("Failed to publish {} event: {}", event.event_type(), e);
        }
        Ok(())
    }
}
