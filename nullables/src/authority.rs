//! Nullable verification authority that answers with a configured outcome.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use vouch_verification::{AuthorityError, AuthorityOutcome, AuthorityRequest, VerificationAuthority};

/// An authority that returns the same result for every request and records
/// what it received.
pub struct NullAuthority {
    result: Result<AuthorityOutcome, AuthorityError>,
    requests: Mutex<Vec<AuthorityRequest>>,
}

impl NullAuthority {
    pub fn returning(outcome: AuthorityOutcome) -> Self {
        Self {
            result: Ok(outcome),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: AuthorityError) -> Self {
        Self {
            result: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far (for assertions).
    pub fn requests(&self) -> Vec<AuthorityRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl VerificationAuthority for NullAuthority {
    async fn verify(&self, request: &AuthorityRequest) -> Result<AuthorityOutcome, AuthorityError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.result.clone()
    }
}
