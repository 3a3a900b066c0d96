//! Domain layer - Pure business logic with no external dependencies
//!
//! This crate contains:
//! - Entities (Tag, Vehicle, Beacon, Zone, ZoneOccupancy, ZoneRoutingRule)
//! - Value Objects (TagCode, BeaconCode, VehicleStatus)
//! - Domain Events
//! - Repository interfaces and the transactional write port (traits)
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Invariants enforced at domain level, backed by storage constraints
//! - Id-valued foreign keys instead of object-graph navigation
//! - Testable in isolation

pub mod beacon;
pub mod error;
pub mod event;
pub mod routing;
pub mod store;
pub mod tag;
pub mod telemetry;
pub mod vehicle;
pub mod zone;

// Re-export commonly used types
pub use beacon::{Beacon, BeaconCode};
pub use error::DomainError;
pub use event::DomainEvent;
pub use tag::{Tag, TagCode};
pub use vehicle::{Vehicle, VehicleModel, VehicleStatus};
pub use zone::{Zone, ZoneOccupancy};
