use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod publisher;
pub use publisher::EventPublisher;

/// Domain events emitted after successful commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    /// A vehicle's resolved zone changed.
    VehicleZoneChanged {
        vehicle_id: Uuid,
        from_zone_id: Option<Uuid>,
        to_zone_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A vehicle's tag binding was moved by the reassignment procedure.
    TagReassigned {
        vehicle_id: Uuid,
        tag_id: Uuid,
        swapped_with: Option<Uuid>,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    pub fn vehicle_zone_changed(
        vehicle_id: Uuid,
        from_zone_id: Option<Uuid>,
        to_zone_id: Uuid,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::VehicleZoneChanged {
            vehicle_id,
            from_zone_id,
            to_zone_id,
            timestamp,
        }
    }

    pub fn tag_reassigned(vehicle_id: Uuid, tag_id: Uuid, swapped_with: Option<Uuid>) -> Self {
        Self::TagReassigned {
            vehicle_id,
            tag_id,
            swapped_with,
            timestamp: Utc::now(),
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &str {
        match self {
            Self::VehicleZoneChanged { .. } => "VehicleZoneChanged",
            Self::TagReassigned { .. } => "TagReassigned",
        }
    }
}
