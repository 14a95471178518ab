//! Wallet identity as it appears in a signable statement.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// The wallet-like address a statement is issued for.
///
/// The format is deliberately not validated beyond being a single non-empty
/// token: checksum and encoding rules belong to the signer. The value must
/// stay on one line of the statement, so whitespace is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Create a new identity from a raw string. Surrounding whitespace is trimmed.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypesError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyIdentity);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(TypesError::InvalidIdentity(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Identity {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Identity> for String {
    fn from(id: Identity) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_keeps_format() {
        let id = Identity::new("  0xAbC123 ").unwrap();
        assert_eq!(id.as_str(), "0xAbC123");
    }

    #[test]
    fn rejects_empty_and_multiline() {
        assert_eq!(Identity::new("   "), Err(TypesError::EmptyIdentity));
        assert!(matches!(
            Identity::new("0xabc\n- urn:verify:action:x"),
            Err(TypesError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn serde_goes_through_validation() {
        let id: Identity = serde_json::from_str("\"0xabc\"").unwrap();
        assert_eq!(id.as_str(), "0xabc");
        assert!(serde_json::from_str::<Identity>("\"\"").is_err());
    }
}
