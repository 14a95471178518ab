//! Signature cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use vouch_types::{Clock, Identity, SystemClock, Timestamp, DEFAULT_SIGNATURE_TTL_SECS};

/// One cached signature and the statement it signs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedSignature {
    pub identity: Identity,
    pub action: String,
    pub signature: String,
    pub message: String,
    pub inserted_at: Timestamp,
}

type Key = (Identity, String);

/// Signatures keyed by `(identity, action)`, each valid for a fixed TTL from
/// insertion.
///
/// Safe to share between tasks. Lookups match the full `(identity, action)`
/// key, so an entry is only ever returned for the identity and action it was
/// stored under; an expired entry is a miss and is removed.
pub struct SignatureCache {
    entries: Mutex<HashMap<Key, CachedSignature>>,
    clock: Arc<dyn Clock>,
    ttl_secs: u64,
}

impl Default for SignatureCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl SignatureCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(clock, DEFAULT_SIGNATURE_TTL_SECS)
    }

    pub fn with_ttl(clock: Arc<dyn Clock>, ttl_secs: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Key, CachedSignature>> {
        // A panic while holding the lock cannot leave an entry half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The cached signature for `identity` and `action`, if still fresh.
    pub fn get(&self, identity: &Identity, action: &str) -> Option<CachedSignature> {
        let now = self.clock.now();
        let key = (identity.clone(), action.to_string());
        let mut entries = self.entries();
        let entry = entries.get(&key)?;

        if entry.inserted_at.has_expired(self.ttl_secs, now) {
            debug!(identity = %identity, action, "cached signature expired");
            entries.remove(&key);
            return None;
        }
        Some(entry.clone())
    }

    pub fn put(&self, identity: &Identity, action: &str, signature: String, message: String) {
        let entry = CachedSignature {
            identity: identity.clone(),
            action: action.to_string(),
            signature,
            message,
            inserted_at: self.clock.now(),
        };
        self.entries()
            .insert((identity.clone(), action.to_string()), entry);
    }

    /// Drop the entry for one `(identity, action)` pair.
    pub fn invalidate(&self, identity: &Identity, action: &str) {
        self.entries()
            .remove(&(identity.clone(), action.to_string()));
    }

    /// Drop every entry for `identity`.
    pub fn invalidate_identity(&self, identity: &Identity) {
        self.entries().retain(|(id, _), _| id != identity);
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Remove expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, e| !e.inserted_at.has_expired(self.ttl_secs, now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
