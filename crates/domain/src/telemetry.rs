use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::beacon::BeaconCode;
use crate::error::{DomainError, Result};
use crate::tag::TagCode;
use crate::zone::ZoneOccupancy;

/// Wire payload of a BLE detection event, as delivered by a gateway.
///
/// Delivery is at-least-once and unordered; the position resolver carries
/// the idempotence burden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionEvent {
    pub tag_code: String,
    pub beacon_code: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<i16>,
}

impl DetectionEvent {
    /// Validate field constraints and normalize codes.
    pub fn validate(&self) -> Result<ValidDetection> {
        let battery_level = match self.battery_level {
            Some(level) if !(0..=100).contains(&level) => {
                return Err(DomainError::InvalidBatteryLevel(level));
            }
            Some(level) => Some(level as u8),
            None => None,
        };

        Ok(ValidDetection {
            tag_code: TagCode::new(&self.tag_code)?,
            beacon_code: BeaconCode::new(&self.beacon_code)?,
            timestamp: self.timestamp,
            battery_level,
        })
    }
}

/// A detection event with validated, normalized fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDetection {
    pub tag_code: TagCode,
    pub beacon_code: BeaconCode,
    pub timestamp: DateTime<Utc>,
    pub battery_level: Option<u8>,
}

/// Change-set produced by the position resolver for one detection event.
/// Applied atomically by the unit of work: either every field lands or
/// none do.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUpdate {
    pub tag_id: Uuid,
    /// New battery level, present only when it differs from the stored one.
    pub battery_level: Option<u8>,
    /// Absent when the tag has no bound vehicle (battery-only update).
    pub telemetry: Option<TelemetryUpdate>,
}

/// Proof-of-life fields plus an optional zone transition for the bound
/// vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryUpdate {
    pub vehicle_id: Uuid,
    pub beacon_code: BeaconCode,
    pub seen_at: DateTime<Utc>,
    pub transition: Option<ZoneTransition>,
}

/// Close the open ledger record (if any) and open a new one, moving the
/// vehicle's `current_zone_id` to `open_record.zone_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneTransition {
    /// Record to close with `exited_at = open_record.entered_at`'s event
    /// timestamp; None when the vehicle had no open interval.
    pub close_record_id: Option<Uuid>,
    pub open_record: ZoneOccupancy,
}
