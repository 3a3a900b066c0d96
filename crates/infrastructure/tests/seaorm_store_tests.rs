//! Integration tests for the SeaORM repositories and unit of work,
//! running against a throwaway SQLite database created per test.

use chrono::{TimeZone, Utc};
use domain::DomainError;
use domain::beacon::BeaconCode;
use domain::store::UnitOfWork;
use domain::tag::{Tag, TagCode, TagRepository};
use domain::telemetry::{PositionUpdate, TelemetryUpdate, ZoneTransition};
use domain::vehicle::{BindingChange, Vehicle, VehicleModel, VehicleRepository, VehicleStatus};
use domain::zone::{OccupancyLedger, ZoneOccupancy};
use infrastructure::database::{
    SeaOrmOccupancyLedger, SeaOrmTagRepository, SeaOrmUnitOfWork, SeaOrmVehicleRepository,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

async fn setup(run_id: &str) -> DatabaseConnection {
    let dir = std::env::temp_dir().join(format!("yard_seaorm_test_{}", run_id));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("test.db");
    let _ = std::fs::remove_file(&path);

    let url = format!("sqlite://{}?mode=rwc", path.display());
    let db = sea_orm::Database::connect(&url).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

fn tag(code: &str) -> Tag {
    Tag {
        id: Uuid::new_v4(),
        code: TagCode::new(code).unwrap(),
        battery_level: 100,
    }
}

fn vehicle(plate: &str, tag_id: Uuid) -> Vehicle {
    Vehicle::new(
        Some(plate.to_string()),
        VehicleModel::Urban125,
        VehicleStatus::InTransit,
        tag_id,
    )
}

#[tokio::test]
async fn test_insert_and_read_back_vehicle() {
    let db = setup("roundtrip").await;
    let store = SeaOrmUnitOfWork::new(db.clone());
    let vehicles = SeaOrmVehicleRepository::new(db.clone());
    let tags = SeaOrmTagRepository::new(db.clone());

    let t = tag("TAG-001");
    let v = vehicle("AB123CD", t.id);
    store.insert_vehicle(&v, Some(&t)).await.unwrap();

    let found = vehicles.find_by_id(v.id).await.unwrap().unwrap();
    assert_eq!(found.plate.as_deref(), Some("AB123CD"));
    assert_eq!(found.model, VehicleModel::Urban125);
    assert_eq!(found.status, VehicleStatus::InTransit);
    assert_eq!(found.bound_tag_id, t.id);

    let by_tag = vehicles.find_by_tag(t.id).await.unwrap().unwrap();
    assert_eq!(by_tag.id, v.id);
    let by_plate = vehicles.find_by_plate("AB123CD").await.unwrap().unwrap();
    assert_eq!(by_plate.id, v.id);

    let stored_tag = tags
        .find_by_code(&TagCode::new("TAG-001").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_tag.id, t.id);
    assert_eq!(stored_tag.battery_level, 100);
}

#[tokio::test]
async fn test_duplicate_tag_code_is_a_conflict() {
    let db = setup("dup_tag").await;
    let store = SeaOrmUnitOfWork::new(db.clone());

    let t1 = tag("TAG-001");
    store
        .insert_vehicle(&vehicle("AA111AA", t1.id), Some(&t1))
        .await
        .unwrap();

    let t2 = tag("TAG-001");
    let err = store
        .insert_vehicle(&vehicle("BB222BB", t2.id), Some(&t2))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    // The failed transaction must not leave the vehicle row behind
    let vehicles = SeaOrmVehicleRepository::new(db);
    assert!(vehicles.find_by_plate("BB222BB").await.unwrap().is_none());
}

#[tokio::test]
async fn test_swap_exchanges_bindings() {
    let db = setup("swap").await;
    let store = SeaOrmUnitOfWork::new(db.clone());
    let vehicles = SeaOrmVehicleRepository::new(db.clone());

    let t1 = tag("TAG-001");
    let v1 = vehicle("AA111AA", t1.id);
    store.insert_vehicle(&v1, Some(&t1)).await.unwrap();
    let t2 = tag("TAG-002");
    let v2 = vehicle("BB222BB", t2.id);
    store.insert_vehicle(&v2, Some(&t2)).await.unwrap();

    store
        .apply_binding_change(&BindingChange::Swap {
            vehicle_id: v1.id,
            new_tag_id: t2.id,
            other_vehicle_id: v2.id,
            old_tag_id: t1.id,
        })
        .await
        .unwrap();

    let v1_after = vehicles.find_by_id(v1.id).await.unwrap().unwrap();
    let v2_after = vehicles.find_by_id(v2.id).await.unwrap().unwrap();
    assert_eq!(v1_after.bound_tag_id, t2.id);
    assert_eq!(v2_after.bound_tag_id, t1.id);
}

#[tokio::test]
async fn test_position_update_commits_ledger_and_telemetry_together() {
    let db = setup("ledger").await;
    let store = SeaOrmUnitOfWork::new(db.clone());
    let vehicles = SeaOrmVehicleRepository::new(db.clone());
    let ledger = SeaOrmOccupancyLedger::new(db.clone());
    let tags = SeaOrmTagRepository::new(db.clone());

    let t = tag("TAG-001");
    let v = vehicle("AB123CD", t.id);
    store.insert_vehicle(&v, Some(&t)).await.unwrap();

    let zone_a = seed_zone(&db, "Receiving").await;
    let zone_b = seed_zone(&db, "Workshop").await;

    let entered = Utc.timestamp_opt(1_750_000_000, 0).unwrap();
    let moved = Utc.timestamp_opt(1_750_000_060, 0).unwrap();

    let first = ZoneOccupancy::open(v.id, zone_a, entered);
    store
        .apply_position_update(&PositionUpdate {
            tag_id: t.id,
            battery_level: Some(88),
            telemetry: Some(TelemetryUpdate {
                vehicle_id: v.id,
                beacon_code: BeaconCode::new("BEACON-A").unwrap(),
                seen_at: entered,
                transition: Some(ZoneTransition {
                    close_record_id: None,
                    open_record: first.clone(),
                }),
            }),
        })
        .await
        .unwrap();

    let open = ledger.find_open(v.id).await.unwrap().unwrap();
    assert_eq!(open.id, first.id);
    assert_eq!(open.zone_id, zone_a);
    assert_eq!(tags.find_by_id(t.id).await.unwrap().unwrap().battery_level, 88);

    store
        .apply_position_update(&PositionUpdate {
            tag_id: t.id,
            battery_level: None,
            telemetry: Some(TelemetryUpdate {
                vehicle_id: v.id,
                beacon_code: BeaconCode::new("BEACON-B").unwrap(),
                seen_at: moved,
                transition: Some(ZoneTransition {
                    close_record_id: Some(first.id),
                    open_record: ZoneOccupancy::open(v.id, zone_b, moved),
                }),
            }),
        })
        .await
        .unwrap();

    let history = ledger.history(v.id).await.unwrap();
    assert_eq!(history.len(), 2);
    // Most recent first
    assert_eq!(history[0].zone_id, zone_b);
    assert!(history[0].is_open());
    assert_eq!(history[1].exited_at, Some(moved));

    let v_after = vehicles.find_by_id(v.id).await.unwrap().unwrap();
    assert_eq!(v_after.current_zone_id, Some(zone_b));
    assert_eq!(
        v_after.last_beacon_code,
        Some(BeaconCode::new("BEACON-B").unwrap())
    );
    assert_eq!(v_after.last_seen_at, Some(moved));
}

#[tokio::test]
async fn test_second_open_record_violates_partial_index() {
    let db = setup("partial_index").await;
    let store = SeaOrmUnitOfWork::new(db.clone());
    let ledger = SeaOrmOccupancyLedger::new(db.clone());

    let t = tag("TAG-001");
    let v = vehicle("AB123CD", t.id);
    store.insert_vehicle(&v, Some(&t)).await.unwrap();
    let zone_a = seed_zone(&db, "Receiving").await;
    let zone_b = seed_zone(&db, "Workshop").await;

    let at = Utc.timestamp_opt(1_750_000_000, 0).unwrap();
    let update = |zone_id| PositionUpdate {
        tag_id: t.id,
        battery_level: None,
        telemetry: Some(TelemetryUpdate {
            vehicle_id: v.id,
            beacon_code: BeaconCode::new("BEACON-A").unwrap(),
            seen_at: at,
            transition: Some(ZoneTransition {
                close_record_id: None,
                open_record: ZoneOccupancy::open(v.id, zone_id, at),
            }),
        }),
    };

    store.apply_position_update(&update(zone_a)).await.unwrap();

    // The partial unique index rejects a second open interval, and the
    // rollback leaves exactly one record
    let err = store.apply_position_update(&update(zone_b)).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(ledger.history(v.id).await.unwrap().len(), 1);
}

async fn seed_zone(db: &DatabaseConnection, name: &str) -> Uuid {
    use infrastructure::database::entities::zones;
    use sea_orm::{ActiveModelTrait, ActiveValue::Set};

    let id = Uuid::new_v4();
    zones::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        yard_id: Set(Uuid::new_v4()),
    }
    .insert(db)
    .await
    .unwrap();
    id
}
