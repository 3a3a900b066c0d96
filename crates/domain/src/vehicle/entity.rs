use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::beacon::BeaconCode;
use crate::vehicle::{VehicleModel, VehicleStatus};

/// A tracked vehicle.
///
/// Zone state and tag binding are plain id-valued fields rather than object
/// references: storage is the source of truth, and the binding bijection and
/// open-occupancy invariants are enforced by uniqueness constraints over
/// exactly these columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: Option<String>,
    pub model: VehicleModel,
    pub status: VehicleStatus,

    /// Zone of the vehicle's open occupancy record, if any.
    pub current_zone_id: Option<Uuid>,

    // Proof-of-life telemetry, updated on every resolved detection
    pub last_beacon_code: Option<BeaconCode>,
    pub last_seen_at: Option<DateTime<Utc>>,

    /// Required 1:1 binding with a Tag; unique across vehicles.
    pub bound_tag_id: Uuid,

    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(
        plate: Option<String>,
        model: VehicleModel,
        status: VehicleStatus,
        bound_tag_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            plate: plate.map(|p| p.to_uppercase()),
            model,
            status,
            current_zone_id: None,
            last_beacon_code: None,
            last_seen_at: None,
            bound_tag_id,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vehicle_uppercases_plate() {
        let tag_id = Uuid::new_v4();
        let vehicle = Vehicle::new(
            Some("abc1d23".to_string()),
            VehicleModel::Urban125,
            VehicleStatus::AwaitingInspection,
            tag_id,
        );
        assert_eq!(vehicle.plate.as_deref(), Some("ABC1D23"));
        assert_eq!(vehicle.bound_tag_id, tag_id);
        assert!(vehicle.current_zone_id.is_none());
    }
}
