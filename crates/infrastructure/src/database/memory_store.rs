use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use domain::DomainError;
use domain::beacon::{Beacon, BeaconCode, BeaconRepository};
use domain::routing::{RoutingRuleRepository, ZoneRoutingRule};
use domain::store::UnitOfWork;
use domain::tag::{Tag, TagCode, TagRepository};
use domain::telemetry::PositionUpdate;
use domain::vehicle::{BindingChange, Vehicle, VehicleRepository};
use domain::zone::{OccupancyLedger, Zone, ZoneOccupancy, ZoneRepository};
use uuid::Uuid;

#[derive(Default)]
struct State {
    tags: HashMap<Uuid, Tag>,
    vehicles: HashMap<Uuid, Vehicle>,
    beacons: HashMap<Uuid, Beacon>,
    zones: HashMap<Uuid, Zone>,
    occupancy: Vec<ZoneOccupancy>,
    rules: Vec<ZoneRoutingRule>,
}

/// In-memory implementation of every storage port, for tests and local
/// runs without a database.
///
/// Write operations check the same invariants the SQL schema enforces
/// (unique codes and plates, the binding bijection, at most one open
/// occupancy record per vehicle) and report violations as
/// `DomainError::Conflict`, so callers exercise the exact failure paths
/// they would see against Postgres.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_tag(&self, tag: Tag) {
        self.state.lock().unwrap().tags.insert(tag.id, tag);
    }

    pub fn seed_vehicle(&self, vehicle: Vehicle) {
        self.state
            .lock()
            .unwrap()
            .vehicles
            .insert(vehicle.id, vehicle);
    }

    pub fn seed_beacon(&self, beacon: Beacon) {
        self.state.lock().unwrap().beacons.insert(beacon.id, beacon);
    }

    pub fn seed_zone(&self, zone: Zone) {
        self.state.lock().unwrap().zones.insert(zone.id, zone);
    }

    pub fn seed_rule(&self, rule: ZoneRoutingRule) {
        self.state.lock().unwrap().rules.push(rule);
    }

    pub fn seed_occupancy(&self, record: ZoneOccupancy) {
        self.state.lock().unwrap().occupancy.push(record);
    }

    /// Snapshot of a vehicle row, for assertions.
    pub fn vehicle(&self, id: Uuid) -> Option<Vehicle> {
        self.state.lock().unwrap().vehicles.get(&id).cloned()
    }

    /// Snapshot of a tag row, for assertions.
    pub fn tag(&self, id: Uuid) -> Option<Tag> {
        self.state.lock().unwrap().tags.get(&id).cloned()
    }

    /// All ledger records for a vehicle, in insertion order.
    pub fn records(&self, vehicle_id: Uuid) -> Vec<ZoneOccupancy> {
        self.state
            .lock()
            .unwrap()
            .occupancy
            .iter()
            .filter(|r| r.vehicle_id == vehicle_id)
            .cloned()
            .collect()
    }

    fn check_tag_insertable(state: &State, tag: &Tag) -> Result<(), DomainError> {
        if state.tags.contains_key(&tag.id)
            || state.tags.values().any(|t| t.code == tag.code)
        {
            return Err(DomainError::Conflict(format!(
                "Tag {} already exists",
                tag.code
            )));
        }
        Ok(())
    }

    fn check_bindable(
        state: &State,
        tag_id: Uuid,
        vehicle_id: Uuid,
    ) -> Result<(), DomainError> {
        if let Some(holder) = state
            .vehicles
            .values()
            .find(|v| v.bound_tag_id == tag_id && v.id != vehicle_id)
        {
            return Err(DomainError::Conflict(format!(
                "Tag {} is already bound to vehicle {}",
                tag_id, holder.id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn find_by_code(&self, code: &TagCode) -> Result<Option<Tag>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.tags.values().find(|t| &t.code == code).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, DomainError> {
        Ok(self.state.lock().unwrap().tags.get(&id).cloned())
    }
}

#[async_trait]
impl VehicleRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, DomainError> {
        Ok(self.state.lock().unwrap().vehicles.get(&id).cloned())
    }

    async fn find_by_tag(&self, tag_id: Uuid) -> Result<Option<Vehicle>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .vehicles
            .values()
            .find(|v| v.bound_tag_id == tag_id)
            .cloned())
    }

    async fn find_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .vehicles
            .values()
            .find(|v| v.plate.as_deref() == Some(plate))
            .cloned())
    }
}

#[async_trait]
impl BeaconRepository for MemoryStore {
    async fn find_by_code(&self, code: &BeaconCode) -> Result<Option<Beacon>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.beacons.values().find(|b| &b.code == code).cloned())
    }
}

#[async_trait]
impl ZoneRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Zone>, DomainError> {
        Ok(self.state.lock().unwrap().zones.get(&id).cloned())
    }

    async fn find_for_yard(&self, yard_id: Uuid) -> Result<Vec<Zone>, DomainError> {
        let state = self.state.lock().unwrap();
        let mut zones: Vec<Zone> = state
            .zones
            .values()
            .filter(|z| z.yard_id == yard_id)
            .cloned()
            .collect();
        zones.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(zones)
    }
}

#[async_trait]
impl OccupancyLedger for MemoryStore {
    async fn find_open(&self, vehicle_id: Uuid) -> Result<Option<ZoneOccupancy>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .occupancy
            .iter()
            .find(|r| r.vehicle_id == vehicle_id && r.is_open())
            .cloned())
    }

    async fn history(&self, vehicle_id: Uuid) -> Result<Vec<ZoneOccupancy>, DomainError> {
        let state = self.state.lock().unwrap();
        let mut records: Vec<ZoneOccupancy> = state
            .occupancy
            .iter()
            .filter(|r| r.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.entered_at.cmp(&a.entered_at));
        Ok(records)
    }
}

#[async_trait]
impl RoutingRuleRepository for MemoryStore {
    async fn find_for_yard(&self, yard_id: Uuid) -> Result<Vec<ZoneRoutingRule>, DomainError> {
        let state = self.state.lock().unwrap();
        let mut rules: Vec<ZoneRoutingRule> = state
            .rules
            .iter()
            .filter(|r| r.yard_id == yard_id)
            .cloned()
            .collect();
        rules.sort_by_key(|r| r.priority);
        Ok(rules)
    }
}

#[async_trait]
impl UnitOfWork for MemoryStore {
    async fn insert_vehicle<'a>(
        &self,
        vehicle: &Vehicle,
        new_tag: Option<&'a Tag>,
    ) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();

        if let Some(tag) = new_tag {
            Self::check_tag_insertable(&state, tag)?;
        }
        if let Some(plate) = &vehicle.plate
            && state
                .vehicles
                .values()
                .any(|v| v.plate.as_deref() == Some(plate.as_str()))
        {
            return Err(DomainError::Conflict(format!(
                "Plate {} already registered",
                plate
            )));
        }
        Self::check_bindable(&state, vehicle.bound_tag_id, vehicle.id)?;

        if let Some(tag) = new_tag {
            state.tags.insert(tag.id, tag.clone());
        }
        state.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(())
    }

    async fn apply_binding_change(&self, change: &BindingChange) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();

        match change {
            BindingChange::Bind {
                vehicle_id,
                tag_id,
                new_tag,
            } => {
                if let Some(tag) = new_tag {
                    Self::check_tag_insertable(&state, tag)?;
                }
                Self::check_bindable(&state, *tag_id, *vehicle_id)?;
                if !state.vehicles.contains_key(vehicle_id) {
                    return Err(DomainError::Conflict(format!(
                        "Vehicle {} does not exist",
                        vehicle_id
                    )));
                }

                if let Some(tag) = new_tag {
                    state.tags.insert(tag.id, tag.clone());
                }
                if let Some(vehicle) = state.vehicles.get_mut(vehicle_id) {
                    vehicle.bound_tag_id = *tag_id;
                }
            }
            BindingChange::Swap {
                vehicle_id,
                new_tag_id,
                other_vehicle_id,
                old_tag_id,
            } => {
                if !state.vehicles.contains_key(vehicle_id)
                    || !state.vehicles.contains_key(other_vehicle_id)
                {
                    return Err(DomainError::Conflict(
                        "Swap references a missing vehicle".to_string(),
                    ));
                }

                // Both rows change together; the bijection holds at commit
                // because the two tags trade places.
                if let Some(other) = state.vehicles.get_mut(other_vehicle_id) {
                    other.bound_tag_id = *old_tag_id;
                }
                if let Some(vehicle) = state.vehicles.get_mut(vehicle_id) {
                    vehicle.bound_tag_id = *new_tag_id;
                }
            }
        }
        Ok(())
    }

    async fn apply_position_update(&self, update: &PositionUpdate) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();

        if update.battery_level.is_some() && !state.tags.contains_key(&update.tag_id) {
            return Err(DomainError::Conflict(format!(
                "Tag {} does not exist",
                update.tag_id
            )));
        }

        if let Some(telemetry) = &update.telemetry {
            if let Some(transition) = &telemetry.transition {
                // All invariant checks happen before the first write, so a
                // rejected change-set leaves the store untouched, just as
                // a rolled-back transaction would.
                let close_idx = transition
                    .close_record_id
                    .map(|record_id| {
                        state
                            .occupancy
                            .iter()
                            .position(|r| r.id == record_id)
                            .ok_or_else(|| {
                                DomainError::Conflict(format!(
                                    "Occupancy record {} does not exist",
                                    record_id
                                ))
                            })
                    })
                    .transpose()?;

                let open = &transition.open_record;
                if state.occupancy.iter().any(|r| {
                    r.vehicle_id == open.vehicle_id
                        && r.is_open()
                        && Some(r.id) != transition.close_record_id
                }) {
                    return Err(DomainError::Conflict(format!(
                        "Vehicle {} already has an open occupancy record",
                        open.vehicle_id
                    )));
                }

                if let Some(idx) = close_idx {
                    state.occupancy[idx].exited_at = Some(telemetry.seen_at);
                }
                state.occupancy.push(open.clone());

                if let Some(vehicle) = state.vehicles.get_mut(&telemetry.vehicle_id) {
                    vehicle.current_zone_id = Some(open.zone_id);
                }
            }

            if let Some(vehicle) = state.vehicles.get_mut(&telemetry.vehicle_id) {
                vehicle.last_beacon_code = Some(telemetry.beacon_code.clone());
                vehicle.last_seen_at = Some(telemetry.seen_at);
            }
        }

        if let Some(level) = update.battery_level
            && let Some(tag) = state.tags.get_mut(&update.tag_id)
        {
            tag.battery_level = level;
        }

        Ok(())
    }
}
