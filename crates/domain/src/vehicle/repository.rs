use crate::error::DomainError;
use crate::vehicle::Vehicle;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for Vehicle reads
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, DomainError>;

    /// Find the vehicle bound to the given tag, if any. The binding is a
    /// bijection, so at most one vehicle can match.
    async fn find_by_tag(&self, tag_id: Uuid) -> Result<Option<Vehicle>, DomainError>;

    /// Find a vehicle by its (uppercase) plate.
    async fn find_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, DomainError>;
}
