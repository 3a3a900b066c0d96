//! Infrastructure layer - External integrations

pub mod config;
pub mod database;
pub mod messaging;

pub use config::ServerConfig;
pub use database::{
    MemoryStore, SeaOrmBeaconRepository, SeaOrmOccupancyLedger, SeaOrmRoutingRuleRepository,
    SeaOrmTagRepository, SeaOrmUnitOfWork, SeaOrmVehicleRepository, SeaOrmZoneRepository,
};
pub use messaging::mqtt_client::{MqttClient, MqttMessage};
pub use messaging::mqtt_publisher::MqttEventPublisher;
