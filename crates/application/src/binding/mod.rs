mod manager;

pub use manager::{BindingManager, NewVehicle};
