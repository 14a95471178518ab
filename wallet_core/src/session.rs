//! A user's signing session.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use vouch_statement::{StatementBuilder, StatementRequest};
use vouch_types::Identity;

use crate::{SignatureCache, Signer, WalletError};

/// A signature together with the exact text it signs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedStatement {
    pub message: String,
    pub signature: String,
    /// Whether this came from the cache instead of a fresh signing prompt.
    pub cached: bool,
}

/// Builds, signs and caches statements for one session.
///
/// The cache belongs to the session. Switching identity empties it, and a
/// signer error drops the entry for the request that failed.
pub struct SigningSession {
    builder: StatementBuilder,
    signer: Arc<dyn Signer>,
    cache: SignatureCache,
    identity: Mutex<Option<Identity>>,
}

impl SigningSession {
    pub fn new(builder: StatementBuilder, signer: Arc<dyn Signer>, cache: SignatureCache) -> Self {
        Self {
            builder,
            signer,
            cache,
            identity: Mutex::new(None),
        }
    }

    pub fn cache(&self) -> &SignatureCache {
        &self.cache
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record the active identity. A change empties the cache.
    pub fn switch_identity(&self, identity: &Identity) {
        let mut current = self.identity.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref() == Some(identity) {
            return;
        }
        if let Some(previous) = current.replace(identity.clone()) {
            info!(from = %previous, to = %identity, "identity switched, clearing signature cache");
            self.cache.clear();
        }
    }

    /// A signed statement for `request`, from the cache when possible.
    pub async fn sign_for(
        &self,
        identity: &Identity,
        request: &StatementRequest,
    ) -> Result<SignedStatement, WalletError> {
        self.switch_identity(identity);
        let action = request.action.as_deref().unwrap_or_default();

        if let Some(hit) = self.cache.get(identity, action) {
            debug!(identity = %identity, action, "using cached signature");
            return Ok(SignedStatement {
                message: hit.message,
                signature: hit.signature,
                cached: true,
            });
        }

        let built = self.builder.build(identity, request)?;
        let signature = match self.signer.sign(identity, built.text()).await {
            Ok(signature) => signature,
            Err(e) => {
                warn!(identity = %identity, action, error = %e, "signing failed");
                self.cache.invalidate(identity, action);
                return Err(e);
            }
        };

        self.cache
            .put(identity, action, signature.clone(), built.text.clone());
        Ok(SignedStatement {
            message: built.text,
            signature,
            cached: false,
        })
    }
}
