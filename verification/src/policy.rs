//! What a relying party requires before forwarding a statement.

use serde::{Deserialize, Serialize};

use vouch_statement::TraitMap;
use vouch_types::Provider;

/// The relying party's own expectations for one use case.
///
/// These come from trusted configuration, never from the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitPolicy {
    pub provider: Provider,
    /// When set, the statement must name exactly this action.
    #[serde(default)]
    pub action: Option<String>,
    /// Trait name → raw comparison the statement must be at least as strict as.
    #[serde(default, rename = "traits")]
    pub expected: TraitMap,
}

impl TraitPolicy {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            action: None,
            expected: TraitMap::new(),
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn require(mut self, name: impl Into<String>, raw: impl Into<String>) -> Self {
        self.expected.insert(name.into(), raw.into());
        self
    }
}
