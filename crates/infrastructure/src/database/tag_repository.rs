use async_trait::async_trait;
use domain::DomainError;
use domain::tag::{Tag, TagCode, TagRepository};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::database::entities::tags;

pub struct SeaOrmTagRepository {
    db: DatabaseConnection,
}

impl SeaOrmTagRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn model_to_tag(model: tags::Model) -> Result<Tag, DomainError> {
    Ok(Tag {
        id: model.id,
        code: TagCode::new(model.code)?,
        battery_level: model.battery_level.clamp(0, 100) as u8,
    })
}

#[async_trait]
impl TagRepository for SeaOrmTagRepository {
    async fn find_by_code(&self, code: &TagCode) -> Result<Option<Tag>, DomainError> {
        let model = tags::Entity::find()
            .filter(tags::Column::Code.eq(code.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Conflict(format!("Database error: {}", e)))?;

        model.map(model_to_tag).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, DomainError> {
        let model = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Conflict(format!("Database error: {}", e)))?;

        model.map(model_to_tag).transpose()
    }
}
