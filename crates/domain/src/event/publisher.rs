use crate::event::DomainEvent;
use async_trait::async_trait;

/// Port for publishing domain events to interested collaborators.
///
/// Publishing is best-effort: implementations log failures, and callers
/// never fail a committed operation because an event could not be
/// delivered.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(
        &self,
        event: DomainEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
