pub mod detection_source;
pub mod mqtt_client;
pub mod mqtt_publisher;

pub use detection_source::MqttDetectionSource;
pub use mqtt_client::{MqttClient, MqttMessage};
pub use mqtt_publisher::MqttEventPublisher;
