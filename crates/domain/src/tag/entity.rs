use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tag::TagCode;

/// Battery level reported by freshly provisioned tags.
pub const DEFAULT_BATTERY_LEVEL: u8 = 100;

/// BLE locator tag affixed to a vehicle.
///
/// The tag itself carries no back-reference to the vehicle; the 1:1 binding
/// is owned by `Vehicle::bound_tag_id` so that the bijection can be enforced
/// with a single uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub code: TagCode,
    pub battery_level: u8,
}

impl Tag {
    /// Provision a new tag with a full battery.
    pub fn provision(code: TagCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            code,
            battery_level: DEFAULT_BATTERY_LEVEL,
        }
    }
}
