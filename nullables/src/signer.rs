//! Nullable signer that records what it was asked to sign.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use vouch_types::Identity;
use vouch_wallet_core::{Signer, WalletError};

/// A signer that returns `0xsig{n}` for the n-th request and remembers every
/// message. [`NullSigner::fail_next`] makes the next request fail as if the
/// user declined.
#[derive(Default)]
pub struct NullSigner {
    signed: Mutex<Vec<String>>,
    counter: AtomicU64,
    fail_next: AtomicBool,
}

impl NullSigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Every message signed so far, in order.
    pub fn signed(&self) -> Vec<String> {
        self.signed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Signer for NullSigner {
    async fn sign(&self, _identity: &Identity, message: &str) -> Result<String, WalletError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(WalletError::Rejected);
        }
        self.signed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("0xsig{n}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_and_fails_on_demand() {
        let signer = NullSigner::new();
        let id = Identity::new("0xa").unwrap();
        assert_eq!(signer.sign(&id, "one").await.unwrap(), "0xsig0");
        signer.fail_next();
        assert!(signer.sign(&id, "two").await.is_err());
        assert_eq!(signer.sign(&id, "three").await.unwrap(), "0xsig1");
        assert_eq!(signer.signed(), vec!["one", "three"]);
    }
}
