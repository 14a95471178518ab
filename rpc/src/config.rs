//! Gateway configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use vouch_grammar::TraitRequirement;
use vouch_types::{StatementParams, DEFAULT_SIGNATURE_TTL_SECS};
use vouch_utils::LogFormat;
use vouch_verification::TraitPolicy;

use crate::RpcError;

/// Configuration for the gateway.
///
/// Can be loaded from a TOML file via [`GatewayConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Policies are keyed by the name
/// clients submit against:
///
/// ```toml
/// port = 8787
/// authority_url = "https://authority.example.com/v1/verify"
///
/// [policies.airdrop]
/// provider = "twitter"
/// action = "airdrop"
///
/// [policies.airdrop.traits]
/// followers = "gte:1000"
/// verified = "true"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the HTTP listener.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, e.g. "info" or "debug,vouch_statement=trace".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Endpoint of the external verification authority.
    #[serde(default = "default_authority_url")]
    pub authority_url: String,

    /// Request timeout for the verification authority, in seconds.
    #[serde(default = "default_authority_timeout_secs")]
    pub authority_timeout_secs: u64,

    /// Lifetime of a cached wallet signature, in seconds.
    #[serde(default = "default_signature_ttl_secs")]
    pub signature_ttl_secs: u64,

    /// Framing used when building statements.
    #[serde(default)]
    pub statement: StatementParams,

    /// Named trait policies.
    #[serde(default)]
    pub policies: BTreeMap<String, TraitPolicy>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_authority_url() -> String {
    "http://127.0.0.1:9000/v1/verify".to_string()
}

fn default_authority_timeout_secs() -> u64 {
    10
}

fn default_signature_ttl_secs() -> u64 {
    DEFAULT_SIGNATURE_TTL_SECS
}

impl GatewayConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, RpcError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RpcError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse and check configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, RpcError> {
        let config: Self = toml::from_str(s).map_err(|e| RpcError::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, RpcError> {
        toml::to_string_pretty(self).map_err(|e| RpcError::Config(e.to_string()))
    }

    /// Every expected trait must be a well-typed requirement; a policy that
    /// can never be satisfied is a configuration mistake.
    pub fn check(&self) -> Result<(), RpcError> {
        for (name, policy) in &self.policies {
            for (trait_name, raw) in &policy.expected {
                TraitRequirement::parse(trait_name, raw).map_err(|e| {
                    RpcError::Config(format!("policy {name}: trait {trait_name}: {e}"))
                })?;
            }
        }
        Ok(())
    }

    pub fn policy(&self, name: &str) -> Option<&TraitPolicy> {
        self.policies.get(name)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            authority_url: default_authority_url(),
            authority_timeout_secs: default_authority_timeout_secs(),
            signature_ttl_secs: default_signature_ttl_secs(),
            statement: StatementParams::default(),
            policies: BTreeMap::new(),
        }
    }
}
