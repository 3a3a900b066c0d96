use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Supported vehicle models (simplified catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleModel {
    Sport100,
    Urban125,
    Trail150,
}

impl VehicleModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sport100 => "Sport100",
            Self::Urban125 => "Urban125",
            Self::Trail150 => "Trail150",
        }
    }
}

impl std::str::FromStr for VehicleModel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Sport100" => Ok(Self::Sport100),
            "Urban125" => Ok(Self::Urban125),
            "Trail150" => Ok(Self::Trail150),
            other => Err(DomainError::InvalidModel(other.to_string())),
        }
    }
}

impl std::fmt::Display for VehicleModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
