use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Value object representing the unique code printed on a BLE tag.
///
/// Rules:
/// - Must be non-empty
/// - Max length 50 characters
/// - Normalized to uppercase (tag lookups are case-insensitive)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagCode(String);

impl TagCode {
    pub const MAX_LEN: usize = 50;

    /// Create a new TagCode, normalizing to uppercase.
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        let trimmed = code.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidTagCode(
                "Tag code cannot be empty".to_string(),
            ));
        }

        if trimmed.len() > Self::MAX_LEN {
            return Err(DomainError::InvalidTagCode(format!(
                "Tag code too long: {} chars (max {})",
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

impl std::fmt::Display for TagCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_code_uppercased() {
        let code = TagCode::new("tag-moto-042").unwrap();
        assert_eq!(code.as_str(), "TAG-MOTO-042");
    }

    #[test]
    fn test_tag_code_equality_is_case_insensitive_after_normalization() {
        let a = TagCode::new("abc123").unwrap();
        let b = TagCode::new("ABC123").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_tag_code() {
        assert!(TagCode::new("   ").is_err());
    }

    #[test]
    fn test_tag_code_too_long() {
        let long = "A".repeat(51);
        assert!(TagCode::new(long).is_err());
    }
}
