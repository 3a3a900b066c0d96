use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Lifecycle and operational states of a vehicle (pickup, yard, external).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleStatus {
    // Pickup
    PendingPickup,
    UnplatedPickup,
    SubscriberPickup,
    InTransit,

    // Yard
    AwaitingInspection,
    MinorRepairs,
    MajorRepairs,
    ExternalMaintenanceScheduled,
    MaintenanceInProgress,
    MaintenanceComplete,
    ReadyForRental,

    // External
    Rented,
    Decommissioned,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPickup => "PendingPickup",
            Self::UnplatedPickup => "UnplatedPickup",
            Self::SubscriberPickup => "SubscriberPickup",
            Self::InTransit => "InTransit",
            Self::AwaitingInspection => "AwaitingInspection",
            Self::MinorRepairs => "MinorRepairs",
            Self::MajorRepairs => "MajorRepairs",
            Self::ExternalMaintenanceScheduled => "ExternalMaintenanceScheduled",
            Self::MaintenanceInProgress => "MaintenanceInProgress",
            Self::MaintenanceComplete => "MaintenanceComplete",
            Self::ReadyForRental => "ReadyForRental",
            Self::Rented => "Rented",
            Self::Decommissioned => "Decommissioned",
        }
    }

    /// Vehicles in this status are allowed to have no plate yet.
    pub fn allows_missing_plate(&self) -> bool {
        matches!(self, Self::UnplatedPickup)
    }
}

impl std::str::FromStr for VehicleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PendingPickup" => Ok(Self::PendingPickup),
            "UnplatedPickup" => Ok(Self::UnplatedPickup),
            "SubscriberPickup" => Ok(Self::SubscriberPickup),
            "InTransit" => Ok(Self::InTransit),
            "AwaitingInspection" => Ok(Self::AwaitingInspection),
            "MinorRepairs" => Ok(Self::MinorRepairs),
            "MajorRepairs" => Ok(Self::MajorRepairs),
            "ExternalMaintenanceScheduled" => Ok(Self::ExternalMaintenanceScheduled),
            "MaintenanceInProgress" => Ok(Self::MaintenanceInProgress),
            "MaintenanceComplete" => Ok(Self::MaintenanceComplete),
            "ReadyForRental" => Ok(Self::ReadyForRental),
            "Rented" => Ok(Self::Rented),
            "Decommissioned" => Ok(Self::Decommissioned),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_round_trip() {
        let status = VehicleStatus::AwaitingInspection;
        assert_eq!(
            VehicleStatus::from_str(status.as_str()).unwrap(),
            status
        );
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(VehicleStatus::from_str("Parked").is_err());
    }
}
