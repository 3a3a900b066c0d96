use async_trait::async_trait;
use domain::DomainError;
use domain::beacon::{Beacon, BeaconCode, BeaconRepository};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::database::entities::beacons;

pub struct SeaOrmBeaconRepository {
    db: DatabaseConnection,
}

impl SeaOrmBeaconRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_beacon(model: beacons::Model) -> Result<Beacon, DomainError> {
    Ok(Beacon {
        id: model.id,
        code: BeaconCode::new(model.code)?,
        active: model.active,
        zone_id: model.zone_id,
    })
}

#[async_trait]
impl BeaconRepository for SeaOrmBeaconRepository {
    async fn find_by_code(&self, code: &BeaconCode) -> Result<Option<Beacon>, DomainError> {
        let model = beacons::Entity::find()
            .filter(beacons::Column::Code.eq(code.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Conflict(format!("Database error: {}", e)))?;

        model.map(model_to_beacon).transpose()
    }
}
