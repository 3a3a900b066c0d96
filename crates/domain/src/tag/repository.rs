use crate::error::DomainError;
use crate::tag::{Tag, TagCode};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for Tag reads
///
/// Implementations are provided in the infrastructure layer. All writes go
/// through the transactional `UnitOfWork` so that multi-entity invariants
/// hold at every commit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Find a tag by its (already normalized) code.
    async fn find_by_code(&self, code: &TagCode) -> Result<Option<Tag>, DomainError>;

    /// Find a tag by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, DomainError>;
}
