//! Statement parameters: the fixed framing every signable statement carries.
//!
//! Relying parties normally override `domain`, `origin` and `statement`; the
//! rest have sensible defaults.

use serde::{Deserialize, Serialize};

/// Default lifetime of a statement: six hours from issuance.
pub const DEFAULT_STATEMENT_TTL_SECS: u64 = 6 * 60 * 60;

/// Default lifetime of a cached signature: five minutes from insertion.
pub const DEFAULT_SIGNATURE_TTL_SECS: u64 = 5 * 60;

/// Framing fields of a statement that are not derived from the request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementParams {
    /// Host requesting the signature, e.g. `app.example.com`.
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Human-readable statement line shown by the wallet.
    #[serde(default = "default_statement")]
    pub statement: String,

    /// Origin URI the statement is scoped to.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Message format version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Numeric scope id (the chain id for EVM wallets).
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Seconds between issued-at and expiration.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_domain() -> String {
    "localhost".to_string()
}

fn default_statement() -> String {
    "Verify account ownership and eligibility requirements.".to_string()
}

fn default_origin() -> String {
    "http://localhost".to_string()
}

fn default_version() -> String {
    "1".to_string()
}

fn default_chain_id() -> u64 {
    1
}

fn default_ttl_secs() -> u64 {
    DEFAULT_STATEMENT_TTL_SECS
}

impl Default for StatementParams {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            statement: default_statement(),
            origin: default_origin(),
            version: default_version(),
            chain_id: default_chain_id(),
            ttl_secs: default_ttl_secs(),
        }
    }
}
