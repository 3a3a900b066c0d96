mod entity;
mod occupancy;
mod repository;

pub use entity::Zone;
pub use occupancy::ZoneOccupancy;
pub use repository::{OccupancyLedger, ZoneRepository};

#[cfg(test)]
pub use repository::{MockOccupancyLedger, MockZoneRepository};
