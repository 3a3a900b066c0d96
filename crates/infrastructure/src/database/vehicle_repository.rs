use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use domain::DomainError;
use domain::beacon::BeaconCode;
use domain::vehicle::{Vehicle, VehicleModel, VehicleRepository, VehicleStatus};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::database::entities::vehicles;

pub struct SeaOrmVehicleRepository {
    db: DatabaseConnection,
}

impl SeaOrmVehicleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn model_to_vehicle(model: vehicles::Model) -> Result<Vehicle, DomainError> {
    let to_chrono = |dt: DateTime<FixedOffset>| -> DateTime<Utc> { dt.with_timezone(&Utc) };

    Ok(Vehicle {
        id: model.id,
        plate: model.plate,
        model: VehicleModel::from_str(&model.model)?,
        status: VehicleStatus::from_str(&model.status)?,
        current_zone_id: model.current_zone_id,
        last_beacon_code: model.last_beacon_code.map(BeaconCode::new).transpose()?,
        last_seen_at: model.last_seen_at.map(to_chrono),
        bound_tag_id: model.bound_tag_id,
        created_at: to_chrono(model.created_at),
    })
}

#[async_trait]
impl VehicleRepository for SeaOrmVehicleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, DomainError> {
        let model = vehicles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Conflict(format!("Database error: {}", e)))?;

        model.map(model_to_vehicle).transpose()
    }

    async fn find_by_tag(&self, tag_id: Uuid) -> Result<Option<Vehicle>, DomainError> {
        let model = vehicles::Entity::find()
            .filter(vehicles::Column::BoundTagId.eq(tag_id))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Conflict(format!("Database error: {}", e)))?;

        model.map(model_to_vehicle).transpose()
    }

    async fn find_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, DomainError> {
        let model = vehicles::Entity::find()
            .filter(vehicles::Column::Plate.eq(plate))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Conflict(format!("Database error: {}", e)))?;

        model.map(model_to_vehicle).transpose()
    }
}
