use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors
///
/// Unknown tags and unknown beacons are deliberately NOT represented here:
/// detection events for unregistered devices are expected noise and are
/// handled as logged no-ops by the position resolver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(Uuid),

    #[error("Zone not found: {0}")]
    ZoneNotFound(Uuid),

    #[error("Tag {0} is already bound to another vehicle")]
    TagAlreadyBound(String),

    #[error("Plate {0} is already registered")]
    PlateAlreadyRegistered(String),

    #[error("Plate is required for status {0}")]
    PlateRequired(String),

    #[error("Invalid tag code: {0}")]
    InvalidTagCode(String),

    #[error("Invalid beacon code: {0}")]
    InvalidBeaconCode(String),

    #[error("Invalid battery level: {0} (expected 0-100)")]
    InvalidBatteryLevel(i16),

    #[error("Invalid vehicle status: {0}")]
    InvalidStatus(String),

    #[error("Invalid vehicle model: {0}")]
    InvalidModel(String),

    /// Storage-level failure during a commit. Conflicts are surfaced to the
    /// caller and never retried internally; masking them could corrupt the
    /// tag-vehicle bijection.
    #[error("Storage conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    /// True for the NotFound family (404-equivalent at a transport boundary).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::VehicleNotFound(_) | Self::ZoneNotFound(_))
    }

    /// True for the Conflict family (409-equivalent at a transport boundary).
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::TagAlreadyBound(_) | Self::PlateAlreadyRegistered(_) | Self::Conflict(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
