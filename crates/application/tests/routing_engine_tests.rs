use std::sync::Arc;

use application::routing::{RoutingBatchRequest, RoutingItem, ZoneRoutingEngine};
use domain::routing::ZoneRoutingRule;
use domain::vehicle::VehicleStatus;
use domain::zone::Zone;
use infrastructure::database::MemoryStore;
use uuid::Uuid;

struct Fixture {
    engine: ZoneRoutingEngine,
    yard_id: Uuid,
    workshop: Uuid,
    overflow: Uuid,
}

/// One yard with a workshop zone (rules at priority 1 and 2 for
/// MinorRepairs) and an overflow zone for ReadyForRental.
fn setup() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let yard_id = Uuid::new_v4();

    let workshop = Uuid::new_v4();
    let overflow = Uuid::new_v4();
    store.seed_zone(Zone {
        id: workshop,
        name: "Workshop".to_string(),
        yard_id,
    });
    store.seed_zone(Zone {
        id: overflow,
        name: "Overflow".to_string(),
        yard_id,
    });

    store.seed_rule(ZoneRoutingRule {
        id: Uuid::new_v4(),
        yard_id,
        status: VehicleStatus::MinorRepairs,
        zone_id: overflow,
        priority: 2,
    });
    store.seed_rule(ZoneRoutingRule {
        id: Uuid::new_v4(),
        yard_id,
        status: VehicleStatus::MinorRepairs,
        zone_id: workshop,
        priority: 1,
    });
    store.seed_rule(ZoneRoutingRule {
        id: Uuid::new_v4(),
        yard_id,
        status: VehicleStatus::ReadyForRental,
        zone_id: overflow,
        priority: 5,
    });

    Fixture {
        engine: ZoneRoutingEngine::new(store.clone(), store.clone()),
        yard_id,
        workshop,
        overflow,
    }
}

fn item(tag_code: &str, status: VehicleStatus) -> RoutingItem {
    RoutingItem {
        plate: None,
        tag_code: tag_code.to_string(),
        status,
    }
}

#[tokio::test]
async fn test_lowest_priority_rule_wins() {
    let f = setup();

    let response = f
        .engine
        .suggest(&RoutingBatchRequest {
            yard_id: f.yard_id,
            items: vec![item("TAG-001", VehicleStatus::MinorRepairs)],
        })
        .await
        .unwrap();

    let suggestion = &response.suggestions[0];
    assert_eq!(suggestion.zone_id, Some(f.workshop));
    assert_eq!(suggestion.zone_name.as_deref(), Some("Workshop"));
    assert!(suggestion.justification.contains("priority 1"));
}

#[tokio::test]
async fn test_unmatched_status_yields_no_zone_with_justification() {
    let f = setup();

    let response = f
        .engine
        .suggest(&RoutingBatchRequest {
            yard_id: f.yard_id,
            items: vec![item("TAG-001", VehicleStatus::Rented)],
        })
        .await
        .unwrap();

    let suggestion = &response.suggestions[0];
    assert_eq!(suggestion.zone_id, None);
    assert!(!suggestion.justification.is_empty());
    assert!(suggestion.justification.contains("No rule configured"));
}

#[tokio::test]
async fn test_items_are_evaluated_independently() {
    let f = setup();

    let response = f
        .engine
        .suggest(&RoutingBatchRequest {
            yard_id: f.yard_id,
            items: vec![
                item("TAG-001", VehicleStatus::MinorRepairs),
                item("TAG-002", VehicleStatus::ReadyForRental),
                item("TAG-003", VehicleStatus::Decommissioned),
            ],
        })
        .await
        .unwrap();

    assert_eq!(response.suggestions.len(), 3);
    assert_eq!(response.suggestions[0].zone_id, Some(f.workshop));
    assert_eq!(response.suggestions[1].zone_id, Some(f.overflow));
    assert_eq!(response.suggestions[2].zone_id, None);
}

#[tokio::test]
async fn test_rules_from_other_yards_are_ignored() {
    let f = setup();

    let response = f
        .engine
        .suggest(&RoutingBatchRequest {
            yard_id: Uuid::new_v4(),
            items: vec![item("TAG-001", VehicleStatus::MinorRepairs)],
        })
        .await
        .unwrap();

    assert_eq!(response.suggestions[0].zone_id, None);
}

#[tokio::test]
async fn test_suggestion_echoes_normalized_identifiers() {
    let f = setup();

    let response = f
        .engine
        .suggest(&RoutingBatchRequest {
            yard_id: f.yard_id,
            items: vec![RoutingItem {
                plate: Some("ab123cd".to_string()),
                tag_code: "tag-001".to_string(),
                status: VehicleStatus::MinorRepairs,
            }],
        })
        .await
        .unwrap();

    let suggestion = &response.suggestions[0];
    assert_eq!(suggestion.plate.as_deref(), Some("AB123CD"));
    assert_eq!(suggestion.tag_code, "TAG-001");
}
