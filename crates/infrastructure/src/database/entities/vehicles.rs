use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub plate: Option<String>,
    pub model: String,
    pub status: String,
    pub current_zone_id: Option<Uuid>,
    pub last_beacon_code: Option<String>,
    pub last_seen_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(unique)]
    pub bound_tag_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tags::Entity",
        from = "Column::BoundTagId",
        to = "super::tags::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Tag,
    #[sea_orm(has_many = "super::zone_occupancy::Entity")]
    ZoneOccupancy,
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl Related<super::zone_occupancy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ZoneOccupancy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
