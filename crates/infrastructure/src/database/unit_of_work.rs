use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use domain::DomainError;
use domain::store::UnitOfWork;
use domain::tag::Tag;
use domain::telemetry::PositionUpdate;
use domain::vehicle::{BindingChange, Vehicle};
use domain::zone::ZoneOccupancy;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, TransactionTrait,
};
use tracing::debug;

use crate::database::entities::{tags, vehicles, zone_occupancy};

/// Name of the deferrable uniqueness constraint backing the binding
/// bijection; created by the initial migration on Postgres.
const BOUND_TAG_CONSTRAINT: &str = "uq_vehicles_bound_tag";

/// Transactional writes for vehicles, tags, and the occupancy ledger.
///
/// Every operation runs in a single transaction; a failed statement drops
/// the transaction and rolls everything back, so no partial state is ever
/// observable. Database errors surface as `DomainError::Conflict` and are
/// never retried here.
pub struct SeaOrmUnitOfWork {
    db: DatabaseConnection,
}

impl SeaOrmUnitOfWork {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_offset(dt: DateTime<Utc>) -> DateTime<FixedOffset> {
        dt.with_timezone(&FixedOffset::east_opt(0).unwrap())
    }

    fn conflict(e: impl std::fmt::Display) -> DomainError {
        DomainError::Conflict(format!("Database error: {}", e))
    }

    async fn begin(&self) -> Result<DatabaseTransaction, DomainError> {
        self.db.begin().await.map_err(Self::conflict)
    }

    async fn insert_tag(txn: &DatabaseTransaction, tag: &Tag) -> Result<(), DomainError> {
        tags::ActiveModel {
            id: Set(tag.id),
            code: Set(tag.code.as_str().to_string()),
            battery_level: Set(tag.battery_level as i16),
        }
        .insert(txn)
        .await
        .map_err(Self::conflict)?;
        Ok(())
    }

    async fn rebind(
        txn: &DatabaseTransaction,
        vehicle_id: uuid::Uuid,
        tag_id: uuid::Uuid,
    ) -> Result<(), DomainError> {
        vehicles::ActiveModel {
            id: Set(vehicle_id),
            bound_tag_id: Set(tag_id),
            ..Default::default()
        }
        .update(txn)
        .await
        .map_err(Self::conflict)?;
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn insert_vehicle<'a>(
        &self,
        vehicle: &Vehicle,
        new_tag: Option<&'a Tag>,
    ) -> Result<(), DomainError> {
        let txn = self.begin().await?;

        if let Some(tag) = new_tag {
            Self::insert_tag(&txn, tag).await?;
        }

        vehicles::ActiveModel {
            id: Set(vehicle.id),
            plate: Set(vehicle.plate.clone()),
            model: Set(vehicle.model.as_str().to_string()),
            status: Set(vehicle.status.as_str().to_string()),
            current_zone_id: Set(vehicle.current_zone_id),
            last_beacon_code: Set(vehicle
                .last_beacon_code
                .as_ref()
                .map(|c| c.as_str().to_string())),
            last_seen_at: Set(vehicle.last_seen_at.map(Self::to_offset)),
            bound_tag_id: Set(vehicle.bound_tag_id),
            created_at: Set(Self::to_offset(vehicle.created_at)),
        }
        .insert(&txn)
        .await
        .map_err(Self::conflict)?;

        txn.commit().await.map_err(Self::conflict)
    }

    async fn apply_binding_change(&self, change: &BindingChange) -> Result<(), DomainError> {
        let txn = self.begin().await?;

        match change {
            BindingChange::Bind {
                vehicle_id,
                tag_id,
                new_tag,
            } => {
                if let Some(tag) = new_tag {
                    Self::insert_tag(&txn, tag).await?;
                }
                Self::rebind(&txn, *vehicle_id, *tag_id).await?;
            }
            BindingChange::Swap {
                vehicle_id,
                new_tag_id,
                other_vehicle_id,
                old_tag_id,
            } => {
                // Both rows transiently hold the same tag between the two
                // updates; defer the uniqueness check to commit so the
                // constraint still backstops the final state.
                if self.db.get_database_backend() == DbBackend::Postgres {
                    txn.execute_unprepared(&format!(
                        "SET CONSTRAINTS {} DEFERRED",
                        BOUND_TAG_CONSTRAINT
                    ))
                    .await
                    .map_err(Self::conflict)?;
                }

                Self::rebind(&txn, *other_vehicle_id, *old_tag_id).await?;
                Self::rebind(&txn, *vehicle_id, *new_tag_id).await?;
                debug!(
                    vehicle_id = %vehicle_id,
                    other_vehicle_id = %other_vehicle_id,
                    "Swapping tag bindings"
                );
            }
        }

        txn.commit().await.map_err(Self::conflict)
    }

    async fn apply_position_update(&self, update: &PositionUpdate) -> Result<(), DomainError> {
        let txn = self.begin().await?;

        if let Some(level) = update.battery_level {
            tags::ActiveModel {
                id: Set(update.tag_id),
                battery_level: Set(level as i16),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map_err(Self::conflict)?;
        }

        if let Some(telemetry) = &update.telemetry {
            let mut vehicle = vehicles::ActiveModel {
                id: Set(telemetry.vehicle_id),
                last_beacon_code: Set(Some(telemetry.beacon_code.as_str().to_string())),
                last_seen_at: Set(Some(Self::to_offset(telemetry.seen_at))),
                ..Default::default()
            };

            if let Some(transition) = &telemetry.transition {
                if let Some(record_id) = transition.close_record_id {
                    zone_occupancy::ActiveModel {
                        id: Set(record_id),
                        exited_at: Set(Some(Self::to_offset(telemetry.seen_at))),
                        ..Default::default()
                    }
                    .update(&txn)
                    .await
                    .map_err(Self::conflict)?;
                }

                let record: &ZoneOccupancy = &transition.open_record;
                zone_occupancy::ActiveModel {
                    id: Set(record.id),
                    vehicle_id: Set(record.vehicle_id),
                    zone_id: Set(record.zone_id),
                    entered_at: Set(Self::to_offset(record.entered_at)),
                    exited_at: Set(record.exited_at.map(Self::to_offset)),
                }
                .insert(&txn)
                .await
                .map_err(Self::conflict)?;

                vehicle.current_zone_id = Set(Some(record.zone_id));
            }

            vehicle.update(&txn).await.map_err(Self::conflict)?;
        }

        txn.commit().await.map_err(Self::conflict)
    }
}
