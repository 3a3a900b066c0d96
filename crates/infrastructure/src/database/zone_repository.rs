use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use domain::DomainError;
use domain::zone::{OccupancyLedger, Zone, ZoneOccupancy, ZoneRepository};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::database::entities::{zone_occupancy, zones};

pub struct SeaOrmZoneRepository {
    db: DatabaseConnection,
}

impl SeaOrmZoneRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_zone(model: zones::Model) -> Zone {
    Zone {
        id: model.id,
        name: model.name,
        yard_id: model.yard_id,
    }
}

#[async_trait]
impl ZoneRepository for SeaOrmZoneRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Zone>, DomainError> {
        let model = zones::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Conflict(format!("Database error: {}", e)))?;

        Ok(model.map(model_to_zone))
    }

    async fn find_for_yard(&self, yard_id: Uuid) -> Result<Vec<Zone>, DomainError> {
        let models = zones::Entity::find()
            .filter(zones::Column::YardId.eq(yard_id))
            .order_by_asc(zones::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Conflict(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(model_to_zone).collect())
    }
}

/// Read side of the occupancy ledger. Appends and closes happen only
/// through `SeaOrmUnitOfWork`.
pub struct SeaOrmOccupancyLedger {
    db: DatabaseConnection,
}

impl SeaOrmOccupancyLedger {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn model_to_occupancy(model: zone_occupancy::Model) -> ZoneOccupancy {
    let to_chrono = |dt: DateTime<FixedOffset>| -> DateTime<Utc> { dt.with_timezone(&Utc) };

    ZoneOccupancy {
        id: model.id,
        vehicle_id: model.vehicle_id,
        zone_id: model.zone_id,
        entered_at: to_chrono(model.entered_at),
        exited_at: model.exited_at.map(to_chrono),
    }
}

#[async_trait]
impl OccupancyLedger for SeaOrmOccupancyLedger {
    async fn find_open(&self, vehicle_id: Uuid) -> Result<Option<ZoneOccupancy>, DomainError> {
        let model = zone_occupancy::Entity::find()
            .filter(zone_occupancy::Column::VehicleId.eq(vehicle_id))
            .filter(zone_occupancy::Column::ExitedAt.is_null())
            .order_by_desc(zone_occupancy::Column::EnteredAt)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Conflict(format!("Database error: {}", e)))?;

        Ok(model.map(model_to_occupancy))
    }

    async fn history(&self, vehicle_id: Uuid) -> Result<Vec<ZoneOccupancy>, DomainError> {
        let models = zone_occupancy::Entity::find()
            .filter(zone_occupancy::Column::VehicleId.eq(vehicle_id))
            .order_by_desc(zone_occupancy::Column::EnteredAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Conflict(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(model_to_occupancy).collect())
    }
}
