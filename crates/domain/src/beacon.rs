use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, Result};

/// Value object for the code broadcast by a fixed beacon.
///
/// Rules mirror `TagCode`: non-empty, max 100 characters, normalized to
/// uppercase for case-insensitive lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeaconCode(String);

impl BeaconCode {
    pub const MAX_LEN: usize = 100;

    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        let trimmed = code.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidBeaconCode(
                "Beacon code cannot be empty".to_string(),
            ));
        }

        if trimmed.len() > Self::MAX_LEN {
            return Err(DomainError::InvalidBeaconCode(format!(
                "Beacon code too long: {} chars (max {})",
                trimmed.len(),
                Self::MAX_LEN
            )));
        }

        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BeaconCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed device detecting nearby tags, optionally associated with a Zone.
///
/// A beacon with no zone (or marked inactive) still yields proof-of-life
/// telemetry for the vehicles it detects, but never drives a zone
/// transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    pub id: Uuid,
    pub code: BeaconCode,
    pub active: bool,
    pub zone_id: Option<Uuid>,
}

impl Beacon {
    /// The zone this beacon reports into, if it can drive transitions.
    pub fn reporting_zone(&self) -> Option<Uuid> {
        if self.active { self.zone_id } else { None }
    }
}

/// Repository interface for Beacon reads
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BeaconRepository: Send + Sync {
    async fn find_by_code(&self, code: &BeaconCode) -> Result<Option<Beacon>>;
}
