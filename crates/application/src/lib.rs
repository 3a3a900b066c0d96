//! Application layer - Use cases and business workflows

pub mod binding;
pub mod messaging;
pub mod routing;
pub mod tracking;

pub use binding::BindingManager;
pub use messaging::DetectionWorkerPool;
pub use routing::ZoneRoutingEngine;
pub use tracking::PositionResolver;
