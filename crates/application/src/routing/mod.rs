mod engine;

pub use engine::{
    RoutingBatchRequest, RoutingBatchResponse, RoutingItem, RoutingSuggestion, ZoneRoutingEngine,
};
