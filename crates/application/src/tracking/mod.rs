mod position_resolver;

pub use position_resolver::{PositionOutcome, PositionResolver, ZoneChange};
