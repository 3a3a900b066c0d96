use crate::error::DomainError;
use crate::zone::{Zone, ZoneOccupancy};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for Zone reads
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ZoneRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Zone>, DomainError>;

    /// All zones of a yard, for snapshot reads by the routing engine.
    async fn find_for_yard(&self, yard_id: Uuid) -> Result<Vec<Zone>, DomainError>;
}

/// Read side of the zone transition ledger.
///
/// Appending and closing records happens exclusively through the unit of
/// work as part of a position update, so the ledger stays append-only and
/// the at-most-one-open-record invariant is checked at commit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OccupancyLedger: Send + Sync {
    /// The vehicle's currently open interval, if any.
    async fn find_open(&self, vehicle_id: Uuid) -> Result<Option<ZoneOccupancy>, DomainError>;

    /// Full interval history for a vehicle, most recent entry first.
    async fn history(&self, vehicle_id: Uuid) -> Result<Vec<ZoneOccupancy>, DomainError>;
}
