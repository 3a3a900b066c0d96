use std::sync::Arc;

use application::tracking::{PositionOutcome, PositionResolver};
use chrono::{TimeZone, Utc};
use domain::beacon::{Beacon, BeaconCode};
use domain::tag::{Tag, TagCode};
use domain::telemetry::DetectionEvent;
use domain::vehicle::{Vehicle, VehicleModel, VehicleStatus};
use domain::zone::Zone;
use infrastructure::database::MemoryStore;
use uuid::Uuid;

struct Fixture {
    store: Arc<MemoryStore>,
    resolver: PositionResolver,
    vehicle_id: Uuid,
    zone_a: Uuid,
    zone_b: Uuid,
}

/// One yard with two zoned beacons, one inactive beacon, one unzoned
/// beacon, a bound tag (battery 80) and an unbound spare tag.
fn setup() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let yard_id = Uuid::new_v4();

    let zone_a = Uuid::new_v4();
    let zone_b = Uuid::new_v4();
    store.seed_zone(Zone {
        id: zone_a,
        name: "Receiving".to_string(),
        yard_id,
    });
    store.seed_zone(Zone {
        id: zone_b,
        name: "Workshop".to_string(),
        yard_id,
    });

    for (code, active, zone_id) in [
        ("BEACON-A", true, Some(zone_a)),
        ("BEACON-B", true, Some(zone_b)),
        ("BEACON-DEAD", false, Some(zone_b)),
        ("BEACON-GATE", true, None),
    ] {
        store.seed_beacon(Beacon {
            id: Uuid::new_v4(),
            code: BeaconCode::new(code).unwrap(),
            active,
            zone_id,
        });
    }

    let tag = Tag {
        id: Uuid::new_v4(),
        code: TagCode::new("TAG-001").unwrap(),
        battery_level: 80,
    };
    let vehicle = Vehicle::new(
        Some("AB123CD".to_string()),
        VehicleModel::Urban125,
        VehicleStatus::InTransit,
        tag.id,
    );
    let vehicle_id = vehicle.id;
    store.seed_tag(tag);
    store.seed_vehicle(vehicle);

    store.seed_tag(Tag {
        id: Uuid::new_v4(),
        code: TagCode::new("TAG-SPARE").unwrap(),
        battery_level: 50,
    });

    let resolver = PositionResolver::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );

    Fixture {
        store,
        resolver,
        vehicle_id,
        zone_a,
        zone_b,
    }
}

fn detection(tag_code: &str, beacon_code: &str, secs: i64, battery: Option<i16>) -> DetectionEvent {
    DetectionEvent {
        tag_code: tag_code.to_string(),
        beacon_code: beacon_code.to_string(),
        timestamp: Utc.timestamp_opt(1_750_000_000 + secs, 0).unwrap(),
        battery_level: battery,
    }
}

#[tokio::test]
async fn test_first_detection_opens_occupancy_record() {
    let f = setup();

    let outcome = f
        .resolver
        .process(&detection("TAG-001", "BEACON-A", 0, None))
        .await
        .unwrap();

    match outcome {
        PositionOutcome::Recorded { vehicle_id, change } => {
            assert_eq!(vehicle_id, f.vehicle_id);
            let change = change.unwrap();
            assert_eq!(change.from_zone_id, None);
            assert_eq!(change.to_zone_id, f.zone_a);
        }
        other => panic!("Unexpected outcome: {:?}", other),
    }

    let records = f.store.records(f.vehicle_id);
    assert_eq!(records.len(), 1);
    assert!(records[0].is_open());
    assert_eq!(records[0].zone_id, f.zone_a);

    let vehicle = f.store.vehicle(f.vehicle_id).unwrap();
    assert_eq!(vehicle.current_zone_id, Some(f.zone_a));
    assert_eq!(
        vehicle.last_beacon_code,
        Some(BeaconCode::new("BEACON-A").unwrap())
    );
}

#[tokio::test]
async fn test_zone_change_closes_previous_record() {
    let f = setup();

    f.resolver
        .process(&detection("TAG-001", "BEACON-A", 0, None))
        .await
        .unwrap();
    f.resolver
        .process(&detection("TAG-001", "BEACON-B", 60, None))
        .await
        .unwrap();

    let records = f.store.records(f.vehicle_id);
    assert_eq!(records.len(), 2);

    let closed = records.iter().find(|r| r.zone_id == f.zone_a).unwrap();
    let open = records.iter().find(|r| r.zone_id == f.zone_b).unwrap();
    assert!(!closed.is_open());
    // The exit instant of the old interval is the entry instant of the new
    assert_eq!(closed.exited_at, Some(open.entered_at));
    assert!(open.is_open());

    let vehicle = f.store.vehicle(f.vehicle_id).unwrap();
    assert_eq!(vehicle.current_zone_id, Some(f.zone_b));
}

#[tokio::test]
async fn test_same_zone_detection_is_proof_of_life_only() {
    let f = setup();

    f.resolver
        .process(&detection("TAG-001", "BEACON-A", 0, None))
        .await
        .unwrap();
    let outcome = f
        .resolver
        .process(&detection("TAG-001", "BEACON-A", 120, None))
        .await
        .unwrap();

    match outcome {
        PositionOutcome::Recorded { change, .. } => assert!(change.is_none()),
        other => panic!("Unexpected outcome: {:?}", other),
    }

    // No new ledger record, but the telemetry moved forward
    assert_eq!(f.store.records(f.vehicle_id).len(), 1);
    let vehicle = f.store.vehicle(f.vehicle_id).unwrap();
    assert_eq!(
        vehicle.last_seen_at,
        Some(Utc.timestamp_opt(1_750_000_120, 0).unwrap())
    );
}

#[tokio::test]
async fn test_duplicate_delivery_is_idempotent() {
    let f = setup();
    let event = detection("TAG-001", "BEACON-A", 0, Some(75));

    f.resolver.process(&event).await.unwrap();
    let before = f.store.vehicle(f.vehicle_id).unwrap();

    // At-least-once delivery: the same payload arrives again
    f.resolver.process(&event).await.unwrap();
    let after = f.store.vehicle(f.vehicle_id).unwrap();

    assert_eq!(f.store.records(f.vehicle_id).len(), 1);
    assert_eq!(before, after);
    let tag = f.store.tag(before.bound_tag_id).unwrap();
    assert_eq!(tag.battery_level, 75);
}

#[tokio::test]
async fn test_unknown_tag_is_soft_ignored() {
    let f = setup();

    let outcome = f
        .resolver
        .process(&detection("TAG-GHOST", "BEACON-A", 0, Some(90)))
        .await
        .unwrap();

    assert_eq!(outcome, PositionOutcome::UnknownTag);
    assert!(f.store.records(f.vehicle_id).is_empty());
}

#[tokio::test]
async fn test_unbound_tag_updates_battery_only() {
    let f = setup();

    let outcome = f
        .resolver
        .process(&detection("TAG-SPARE", "BEACON-A", 0, Some(42)))
        .await
        .unwrap();

    match outcome {
        PositionOutcome::TagUnbound {
            tag_id,
            battery_updated,
        } => {
            assert!(battery_updated);
            assert_eq!(f.store.tag(tag_id).unwrap().battery_level, 42);
        }
        other => panic!("Unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_unchanged_battery_is_not_rewritten() {
    let f = setup();

    let outcome = f
        .resolver
        .process(&detection("TAG-SPARE", "BEACON-A", 0, Some(50)))
        .await
        .unwrap();

    match outcome {
        PositionOutcome::TagUnbound {
            battery_updated, ..
        } => assert!(!battery_updated),
        other => panic!("Unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_inactive_beacon_never_drives_transition() {
    let f = setup();

    f.resolver
        .process(&detection("TAG-001", "BEACON-A", 0, None))
        .await
        .unwrap();
    let outcome = f
        .resolver
        .process(&detection("TAG-001", "BEACON-DEAD", 60, None))
        .await
        .unwrap();

    match outcome {
        PositionOutcome::Recorded { change, .. } => assert!(change.is_none()),
        other => panic!("Unexpected outcome: {:?}", other),
    }

    // Still in zone A, but the sighting itself was recorded
    let vehicle = f.store.vehicle(f.vehicle_id).unwrap();
    assert_eq!(vehicle.current_zone_id, Some(f.zone_a));
    assert_eq!(
        vehicle.last_beacon_code,
        Some(BeaconCode::new("BEACON-DEAD").unwrap())
    );
}

#[tokio::test]
async fn test_unzoned_beacon_gives_proof_of_life_only() {
    let f = setup();

    let outcome = f
        .resolver
        .process(&detection("TAG-001", "BEACON-GATE", 0, None))
        .await
        .unwrap();

    match outcome {
        PositionOutcome::Recorded { change, .. } => assert!(change.is_none()),
        other => panic!("Unexpected outcome: {:?}", other),
    }

    assert!(f.store.records(f.vehicle_id).is_empty());
    let vehicle = f.store.vehicle(f.vehicle_id).unwrap();
    assert!(vehicle.last_seen_at.is_some());
}

#[tokio::test]
async fn test_unknown_beacon_gives_proof_of_life_only() {
    let f = setup();

    let outcome = f
        .resolver
        .process(&detection("TAG-001", "BEACON-NOWHERE", 0, None))
        .await
        .unwrap();

    match outcome {
        PositionOutcome::Recorded { change, .. } => assert!(change.is_none()),
        other => panic!("Unexpected outcome: {:?}", other),
    }
    assert!(f.store.records(f.vehicle_id).is_empty());
}

#[tokio::test]
async fn test_codes_are_matched_case_insensitively() {
    let f = setup();

    let outcome = f
        .resolver
        .process(&detection("tag-001", "beacon-a", 0, None))
        .await
        .unwrap();

    match outcome {
        PositionOutcome::Recorded { vehicle_id, change } => {
            assert_eq!(vehicle_id, f.vehicle_id);
            assert!(change.is_some());
        }
        other => panic!("Unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_battery_level_is_rejected() {
    let f = setup();

    let err = f
        .resolver
        .process(&detection("TAG-001", "BEACON-A", 0, Some(150)))
        .await
        .unwrap_err();

    assert!(matches!(err, domain::DomainError::InvalidBatteryLevel(150)));
    assert!(f.store.records(f.vehicle_id).is_empty());
}
