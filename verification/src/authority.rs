//! Seam to the external verification authority.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::AuthorityError;

/// What the authority receives: the signed statement and its signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityRequest {
    pub signature: String,
    pub message: String,
}

/// The three response classes the authority distinguishes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuthorityOutcome {
    /// Account ownership proven and every requirement met.
    Verified {
        /// Per-action derived token, when the authority issues one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },
    /// The account has not been verified with the authority yet.
    NotVerified,
    /// Ownership proven, but the account does not meet the requirements.
    RequirementsUnmet,
}

impl AuthorityOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Verified { .. } => "verified",
            Self::NotVerified => "not_verified",
            Self::RequirementsUnmet => "requirements_unmet",
        }
    }
}

/// The external authority that checks signatures and account traits.
#[async_trait]
pub trait VerificationAuthority: Send + Sync {
    async fn verify(&self, request: &AuthorityRequest) -> Result<AuthorityOutcome, AuthorityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_wire_form() {
        let verified: AuthorityOutcome =
            serde_json::from_str(r#"{"status":"verified","token":"t-1"}"#).unwrap();
        assert_eq!(
            verified,
            AuthorityOutcome::Verified {
                token: Some("t-1".into())
            }
        );
        let unmet: AuthorityOutcome =
            serde_json::from_str(r#"{"status":"requirements_unmet"}"#).unwrap();
        assert_eq!(unmet.label(), "requirements_unmet");
        assert_eq!(
            serde_json::to_string(&AuthorityOutcome::NotVerified).unwrap(),
            r#"{"status":"not_verified"}"#
        );
    }
}
