//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for remote identifiers. Each newtype ensures
//! data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// Remote identifiers
// ============================================================================

/// Identifier of a remote file resource
///
/// Drive file IDs are opaque strings made of ASCII letters, digits, `-` and
/// `_` (e.g. "1a2B3c4D5e6F7g8H9i0J-kLmNoPqRsTuV"). The alias `root` is also
/// accepted since it is a valid parent identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId(String);

impl ResourceId {
    /// Create a new ResourceId
    ///
    /// # Errors
    /// Returns error if the ID is empty or contains invalid characters
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidResourceId(
                "Resource ID cannot be empty".to_string(),
            ));
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::InvalidResourceId(format!(
                "Resource ID contains invalid characters: {id}"
            )));
        }

        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for ResourceId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_id() {
        let id = ResourceId::new("1a2B3c4D5e6F7g8H9i0J-kLmNoPqRsTuV".to_string()).unwrap();
        assert_eq!(id.as_str(), "1a2B3c4D5e6F7g8H9i0J-kLmNoPqRsTuV");
    }

    #[test]
    fn test_root_alias_is_valid() {
        let id: ResourceId = "root".parse().unwrap();
        assert_eq!(id.to_string(), "root");
    }

    #[test]
    fn test_empty_fails() {
        let result = ResourceId::new(String::new());
        assert!(matches!(result, Err(DomainError::InvalidResourceId(_))));
    }

    #[test]
    fn test_invalid_chars_fails() {
        assert!(ResourceId::new("bad/id".to_string()).is_err());
        assert!(ResourceId::new("with space".to_string()).is_err());
        assert!(ResourceId::new("id?fields=*".to_string()).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = ResourceId::new("ABC_123".to_string()).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ABC_123\"");
        let parsed: ResourceId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let parsed: Result<ResourceId, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
    }
}
