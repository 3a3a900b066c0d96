use std::str::FromStr;

use async_trait::async_trait;
use domain::DomainError;
use domain::routing::{RoutingRuleRepository, ZoneRoutingRule};
use domain::vehicle::VehicleStatus;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::database::entities::zone_routing_rules;

pub struct SeaOrmRoutingRuleRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoutingRuleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_rule(model: zone_routing_rules::Model) -> Result<ZoneRoutingRule, DomainError> {
    Ok(ZoneRoutingRule {
        id: model.id,
        yard_id: model.yard_id,
        status: VehicleStatus::from_str(&model.status)?,
        zone_id: model.zone_id,
        priority: model.priority,
    })
}

#[async_trait]
impl RoutingRuleRepository for SeaOrmRoutingRuleRepository {
    async fn find_for_yard(&self, yard_id: Uuid) -> Result<Vec<ZoneRoutingRule>, DomainError> {
        let models = zone_routing_rules::Entity::find()
            .filter(zone_routing_rules::Column::YardId.eq(yard_id))
            .order_by_asc(zone_routing_rules::Column::Priority)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Conflict(format!("Database error: {}", e)))?;

        models.into_iter().map(model_to_rule).collect()
    }
}
