use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ledger entry: a continuous interval during which a vehicle occupied a
/// zone. `exited_at == None` means the interval is still open.
///
/// Records are append-only; an open record is closed only by the next zone
/// transition for that vehicle. A vehicle has at most one open record at
/// any time (backed by a partial unique index in storage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneOccupancy {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub zone_id: Uuid,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
}

impl ZoneOccupancy {
    /// Open a new occupancy interval at `entered_at`.
    pub fn open(vehicle_id: Uuid, zone_id: Uuid, entered_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            zone_id,
            entered_at,
            exited_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.exited_at.is_none()
    }

    /// Close the interval at `exited_at`. Timestamps are taken verbatim
    /// from the triggering event; out-of-order delivery can yield a
    /// non-monotonic interval (accepted limitation).
    pub fn close(&mut self, exited_at: DateTime<Utc>) {
        self.exited_at = Some(exited_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_then_close() {
        let t0 = Utc::now();
        let mut record = ZoneOccupancy::open(Uuid::new_v4(), Uuid::new_v4(), t0);
        assert!(record.is_open());

        let t1 = t0 + chrono::Duration::minutes(5);
        record.close(t1);
        assert!(!record.is_open());
        assert_eq!(record.exited_at, Some(t1));
        assert_eq!(record.entered_at, t0);
    }
}
