use std::sync::Arc;

use domain::DomainEvent;
use domain::beacon::BeaconRepository;
use domain::error::Result;
use domain::event::EventPublisher;
use domain::store::UnitOfWork;
use domain::tag::TagRepository;
use domain::telemetry::{DetectionEvent, PositionUpdate, TelemetryUpdate, ZoneTransition};
use domain::vehicle::VehicleRepository;
use domain::zone::{OccupancyLedger, ZoneOccupancy};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What a processed detection event amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionOutcome {
    /// Tag code not registered; nothing mutated. Expected noise, not an
    /// error: devices may be detected before being registered.
    UnknownTag,

    /// Tag exists but has no bound vehicle; at most the battery level was
    /// persisted.
    TagUnbound { tag_id: Uuid, battery_updated: bool },

    /// Proof-of-life recorded for the bound vehicle, with an optional zone
    /// change.
    Recorded {
        vehicle_id: Uuid,
        change: Option<ZoneChange>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneChange {
    pub from_zone_id: Option<Uuid>,
    pub to_zone_id: Uuid,
}

/// Resolves detection events into telemetry and zone transitions.
///
/// Steps per event:
/// 1. Look up the tag (case-insensitive); unknown tags are logged no-ops
/// 2. Stage a battery update when the reported level differs
/// 3. Unbound tag: persist the battery update (if any) and stop
/// 4. Unconditionally stage proof-of-life (last beacon, last seen)
/// 5. Resolve the beacon; unknown, inactive, or unzoned beacons never
///    drive a transition
/// 6. Zone changed: close the open ledger record, open a new one
/// 7. Commit the whole change-set in one transaction
///
/// Timestamps are applied verbatim; there is no monotonicity validation,
/// so out-of-order delivery can produce non-monotonic intervals.
/// Redelivering an identical event is idempotent: the zone inequality
/// guard prevents a duplicate record, and the telemetry fields re-apply
/// the same values.
pub struct PositionResolver {
    tags: Arc<dyn TagRepository>,
    vehicles: Arc<dyn VehicleRepository>,
    beacons: Arc<dyn BeaconRepository>,
    ledger: Arc<dyn OccupancyLedger>,
    store: Arc<dyn UnitOfWork>,
    publisher: Option<Arc<dyn EventPublisher>>,
}

impl PositionResolver {
    pub fn new(
        tags: Arc<dyn TagRepository>,
        vehicles: Arc<dyn VehicleRepository>,
        beacons: Arc<dyn BeaconRepository>,
        ledger: Arc<dyn OccupancyLedger>,
        store: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            tags,
            vehicles,
            beacons,
            ledger,
            store,
            publisher: None,
        }
    }

    /// Attach an event publisher notified after committed zone changes.
    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub async fn process(&self, event: &DetectionEvent) -> Result<PositionOutcome> {
        let detection = event.validate()?;

        let tag = match self.tags.find_by_code(&detection.tag_code).await? {
            Some(tag) => tag,
            None => {
                warn!(tag_code = %detection.tag_code, "Detection for unknown tag; ignoring");
                return Ok(PositionOutcome::UnknownTag);
            }
        };

        let battery_level = detection
            .battery_level
            .filter(|level| *level != tag.battery_level);

        let vehicle = match self.vehicles.find_by_tag(tag.id).await? {
            Some(vehicle) => vehicle,
            None => {
                let battery_updated = battery_level.is_some();
                if battery_updated {
                    self.store
                        .apply_position_update(&PositionUpdate {
                            tag_id: tag.id,
                            battery_level,
                            telemetry: None,
                        })
                        .await?;
                }
                warn!(tag_code = %detection.tag_code, battery_updated, "Tag has no bound vehicle");
                return Ok(PositionOutcome::TagUnbound {
                    tag_id: tag.id,
                    battery_updated,
                });
            }
        };

        let beacon = self.beacons.find_by_code(&detection.beacon_code).await?;
        let new_zone_id = match &beacon {
            Some(beacon) => beacon.reporting_zone(),
            None => {
                debug!(beacon_code = %detection.beacon_code, "Detection from unknown beacon");
                None
            }
        };

        let transition = match new_zone_id {
            Some(zone_id) if vehicle.current_zone_id != Some(zone_id) => {
                let close_record_id = self
                    .ledger
                    .find_open(vehicle.id)
                    .await?
                    .map(|record| record.id);
                Some(ZoneTransition {
                    close_record_id,
                    open_record: ZoneOccupancy::open(vehicle.id, zone_id, detection.timestamp),
                })
            }
            _ => None,
        };

        let change = transition.as_ref().map(|t| ZoneChange {
            from_zone_id: vehicle.current_zone_id,
            to_zone_id: t.open_record.zone_id,
        });

        self.store
            .apply_position_update(&PositionUpdate {
                tag_id: tag.id,
                battery_level,
                telemetry: Some(TelemetryUpdate {
                    vehicle_id: vehicle.id,
                    beacon_code: detection.beacon_code.clone(),
                    seen_at: detection.timestamp,
                    transition,
                }),
            })
            .await?;

        match &change {
            Some(change) => {
                info!(
                    vehicle_id = %vehicle.id,
                    zone_id = %change.to_zone_id,
                    "Vehicle moved to new zone"
                );
                if let Some(publisher) = &self.publisher {
                    let event = DomainEvent::vehicle_zone_changed(
                        vehicle.id,
                        change.from_zone_id,
                        change.to_zone_id,
                        detection.timestamp,
                    );
                    if let Err(e) = publisher.publish(event).await {
                        warn!(vehicle_id = %vehicle.id, error = %e, "Failed to publish zone change");
                    }
                }
            }
            None => {
                debug!(vehicle_id = %vehicle.id, beacon = %detection.beacon_code, "Proof of life recorded");
            }
        }

        Ok(PositionOutcome::Recorded {
            vehicle_id: vehicle.id,
            change,
        })
    }
}
