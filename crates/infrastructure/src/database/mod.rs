pub mod entities;

mod beacon_repository;
mod memory_store;
mod rule_repository;
mod tag_repository;
mod unit_of_work;
mod vehicle_repository;
mod zone_repository;

pub use beacon_repository::SeaOrmBeaconRepository;
pub use memory_store::MemoryStore;
pub use rule_repository::SeaOrmRoutingRuleRepository;
pub use tag_repository::SeaOrmTagRepository;
pub use unit_of_work::SeaOrmUnitOfWork;
pub use vehicle_repository::SeaOrmVehicleRepository;
pub use zone_repository::{SeaOrmOccupancyLedger, SeaOrmZoneRepository};

use sea_orm::DatabaseConnection;

/// Open a connection to the configured database.
pub async fn connect(url: &str) -> anyhow::Result<DatabaseConnection> {
    let db = sea_orm::Database::connect(url).await?;
    tracing::info!("Connected to database");
    Ok(db)
}
