use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::vehicle::VehicleStatus;

/// Routing rule: vehicles with `status` in `yard_id` should go to
/// `zone_id`. Lower `priority` wins. (yard, status, priority) is unique;
/// behavior under a violated uniqueness invariant is undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRoutingRule {
    pub id: Uuid,
    pub yard_id: Uuid,
    pub status: VehicleStatus,
    pub zone_id: Uuid,
    pub priority: i32,
}

/// Repository interface for routing rule reads
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoutingRuleRepository: Send + Sync {
    /// Snapshot of all rules configured for a yard, ordered by priority
    /// ascending.
    async fn find_for_yard(&self, yard_id: Uuid) -> Result<Vec<ZoneRoutingRule>, DomainError>;
}
