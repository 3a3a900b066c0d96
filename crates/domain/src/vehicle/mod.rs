mod binding;
mod entity;
mod model;
mod repository;
mod status;

pub use binding::BindingChange;
pub use entity::Vehicle;
pub use model::VehicleModel;
pub use repository::VehicleRepository;
pub use status::VehicleStatus;

#[cfg(test)]
pub use repository::MockVehicleRepository;
