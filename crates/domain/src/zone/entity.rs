use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sub-area of a yard used for routing and occupancy tracking.
///
/// Zones are owned by the external entity store; this core never creates or
/// deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    pub yard_id: Uuid,
}
