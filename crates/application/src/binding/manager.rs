use std::sync::Arc;

use domain::DomainEvent;
use domain::error::{DomainError, Result};
use domain::event::EventPublisher;
use domain::store::UnitOfWork;
use domain::tag::{Tag, TagCode, TagRepository};
use domain::vehicle::{BindingChange, Vehicle, VehicleModel, VehicleRepository, VehicleStatus};
use tracing::{info, warn};
use uuid::Uuid;

/// Registration request for a new vehicle.
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub plate: Option<String>,
    pub model: VehicleModel,
    pub status: VehicleStatus,
    pub tag_code: String,
}

/// Owns the 1:1 tag-vehicle binding.
///
/// Bindings are created at vehicle registration and mutated solely through
/// `reassign_tag`, the single operation allowed to move a tag between
/// vehicles. Both paths commit through the unit of work so the binding
/// relation stays a bijection at every commit point.
pub struct BindingManager {
    tags: Arc<dyn TagRepository>,
    vehicles: Arc<dyn VehicleRepository>,
    store: Arc<dyn UnitOfWork>,
    publisher: Option<Arc<dyn EventPublisher>>,
}

impl BindingManager {
    pub fn new(
        tags: Arc<dyn TagRepository>,
        vehicles: Arc<dyn VehicleRepository>,
        store: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            tags,
            vehicles,
            store,
            publisher: None,
        }
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Register a vehicle, binding it to a new or existing tag.
    ///
    /// The tag is created with a full battery when its code is unknown. A
    /// tag already bound to a different vehicle is never silently stolen:
    /// that is a Conflict, and callers should use `reassign_tag` for a
    /// safe exchange.
    pub async fn register_vehicle(&self, request: NewVehicle) -> Result<Vehicle> {
        let tag_code = TagCode::new(&request.tag_code)?;

        let plate = match &request.plate {
            Some(plate) if !plate.trim().is_empty() => Some(plate.trim().to_uppercase()),
            _ if request.status.allows_missing_plate() => None,
            _ => return Err(DomainError::PlateRequired(request.status.to_string())),
        };

        if let Some(plate) = &plate
            && self.vehicles.find_by_plate(plate).await?.is_some()
        {
            return Err(DomainError::PlateAlreadyRegistered(plate.clone()));
        }

        let (tag_id, new_tag) = match self.tags.find_by_code(&tag_code).await? {
            Some(existing) => {
                if let Some(holder) = self.vehicles.find_by_tag(existing.id).await? {
                    warn!(tag_code = %tag_code, vehicle_id = %holder.id, "Tag already bound");
                    return Err(DomainError::TagAlreadyBound(tag_code.as_str().to_string()));
                }
                (existing.id, None)
            }
            None => {
                let tag = Tag::provision(tag_code.clone());
                (tag.id, Some(tag))
            }
        };

        let vehicle = Vehicle::new(plate, request.model, request.status, tag_id);
        self.store
            .insert_vehicle(&vehicle, new_tag.as_ref())
            .await?;

        info!(
            vehicle_id = %vehicle.id,
            tag_code = %tag_code,
            plate = vehicle.plate.as_deref().unwrap_or("N/A"),
            "Vehicle registered"
        );
        Ok(vehicle)
    }

    /// Move a tag onto an existing vehicle.
    ///
    /// - Unknown code: a tag is provisioned (battery 100) and bound.
    /// - Unbound tag, or already the vehicle's own: simple rebind.
    /// - Tag bound to another vehicle: the two vehicles exchange tags in
    ///   one transaction, so no durable state ever shows two vehicles on
    ///   the same tag or the target vehicle with no tag.
    pub async fn reassign_tag(&self, vehicle_id: Uuid, new_tag_code: &str) -> Result<()> {
        let tag_code = TagCode::new(new_tag_code)?;
        info!(vehicle_id = %vehicle_id, tag_code = %tag_code, "Reassigning tag");

        let vehicle = self
            .vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or(DomainError::VehicleNotFound(vehicle_id))?;

        let change = match self.tags.find_by_code(&tag_code).await? {
            None => {
                let tag = Tag::provision(tag_code.clone());
                BindingChange::Bind {
                    vehicle_id,
                    tag_id: tag.id,
                    new_tag: Some(tag),
                }
            }
            Some(tag) => match self.vehicles.find_by_tag(tag.id).await? {
                Some(holder) if holder.id != vehicle_id => BindingChange::Swap {
                    vehicle_id,
                    new_tag_id: tag.id,
                    other_vehicle_id: holder.id,
                    old_tag_id: vehicle.bound_tag_id,
                },
                _ => BindingChange::Bind {
                    vehicle_id,
                    tag_id: tag.id,
                    new_tag: None,
                },
            },
        };

        self.store.apply_binding_change(&change).await?;

        let (tag_id, swapped_with) = match &change {
            BindingChange::Bind { tag_id, .. } => (*tag_id, None),
            BindingChange::Swap {
                new_tag_id,
                other_vehicle_id,
                ..
            } => {
                info!(
                    vehicle_id = %vehicle_id,
                    other_vehicle_id = %other_vehicle_id,
                    "Tags swapped between vehicles"
                );
                (*new_tag_id, Some(*other_vehicle_id))
            }
        };

        if let Some(publisher) = &self.publisher {
            let event = DomainEvent::tag_reassigned(vehicle_id, tag_id, swapped_with);
            if let Err(e) = publisher.publish(event).await {
                warn!(vehicle_id = %vehicle_id, error = %e, "Failed to publish reassignment");
            }
        }
        Ok(())
    }
}
