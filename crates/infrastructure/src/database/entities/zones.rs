use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "zones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub yard_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::beacons::Entity")]
    Beacons,
    #[sea_orm(has_many = "super::zone_occupancy::Entity")]
    ZoneOccupancy,
    #[sea_orm(has_many = "super::zone_routing_rules::Entity")]
    RoutingRules,
}

impl Related<super::beacons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Beacons.def()
    }
}

impl Related<super::zone_occupancy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ZoneOccupancy.def()
    }
}

impl Related<super::zone_routing_rules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoutingRules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
