use async_trait::async_trait;

use crate::error::DomainError;
use crate::tag::Tag;
use crate::telemetry::PositionUpdate;
use crate::vehicle::{BindingChange, Vehicle};

/// Transactional write port.
///
/// Every mutation of vehicles, tags, and the occupancy ledger goes through
/// one of these operations, each of which must be applied atomically: the
/// data-model invariants (single open occupancy record, binding bijection,
/// unique codes) must hold at every commit. Storage failures surface as
/// `DomainError::Conflict` and are never retried here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Insert a vehicle, creating its tag in the same transaction when
    /// `new_tag` is present (bind-new-or-existing at registration).
    async fn insert_vehicle<'a>(
        &self,
        vehicle: &Vehicle,
        new_tag: Option<&'a Tag>,
    ) -> Result<(), DomainError>;

    /// Apply a binding rebind or swap in one transaction.
    async fn apply_binding_change(&self, change: &BindingChange) -> Result<(), DomainError>;

    /// Apply the change-set for one detection event in one transaction.
    async fn apply_position_update(&self, update: &PositionUpdate) -> Result<(), DomainError>;
}
