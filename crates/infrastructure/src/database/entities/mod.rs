pub mod beacons;
pub mod tags;
pub mod vehicles;
pub mod zone_occupancy;
pub mod zone_routing_rules;
pub mod zones;
