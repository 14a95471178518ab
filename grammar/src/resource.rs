//! Namespaced resource identifiers embedded in signable statements.

use std::fmt;

use vouch_types::Provider;

use crate::{EncodedTrait, GrammarError};

/// Namespace shared by every identifier this crate reads or writes.
pub const URN_PREFIX: &str = "urn:verify:";

const PROVIDER_KIND: &str = "provider:";
const ACTION_KIND: &str = "action:";
const VERIFICATION_ID_KIND: &str = "verificationid:";

/// One resource identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceId {
    /// `urn:verify:provider:{provider}`: scopes the statement to a provider.
    ProviderScope(Provider),
    /// `urn:verify:provider:{provider}:{name}:{operator}:{value}`.
    Trait {
        provider: Provider,
        requirement: EncodedTrait,
    },
    /// `urn:verify:action:{action}`.
    Action(String),
    /// `urn:verify:verificationid:{id}`.
    VerificationId(String),
}

impl ResourceId {
    /// Build an action identifier. The action must be non-empty and fit on one line.
    pub fn action(action: &str) -> Result<Self, GrammarError> {
        check_single_line(action)?;
        Ok(Self::Action(action.to_string()))
    }

    /// Build a verification-id identifier. Same constraints as [`ResourceId::action`].
    pub fn verification_id(id: &str) -> Result<Self, GrammarError> {
        check_single_line(id)?;
        Ok(Self::VerificationId(id.to_string()))
    }

    /// Decode one identifier.
    ///
    /// Trait identifiers must carry a well-formed `{name}:{operator}:{value}`
    /// body; anything else under the namespace is
    /// [`GrammarError::MalformedResourceLine`]. Provider names outside the
    /// supported set are [`GrammarError::UnknownProvider`].
    pub fn parse(s: &str) -> Result<Self, GrammarError> {
        let malformed = || GrammarError::MalformedResourceLine(s.to_string());
        let rest = s.strip_prefix(URN_PREFIX).ok_or_else(malformed)?;

        if let Some(scoped) = rest.strip_prefix(PROVIDER_KIND) {
            let (name, body) = match scoped.split_once(':') {
                Some((name, body)) => (name, Some(body)),
                None => (scoped, None),
            };
            let provider = name
                .parse::<Provider>()
                .ok()
                .filter(|p| p.as_str() == name)
                .ok_or_else(|| GrammarError::UnknownProvider(name.to_string()))?;
            return match body {
                None => Ok(Self::ProviderScope(provider)),
                Some(body) => Ok(Self::Trait {
                    provider,
                    requirement: EncodedTrait::decode(body).map_err(|_| malformed())?,
                }),
            };
        }
        if let Some(action) = rest.strip_prefix(ACTION_KIND) {
            return Self::action(action).map_err(|_| malformed());
        }
        if let Some(id) = rest.strip_prefix(VERIFICATION_ID_KIND) {
            return Self::verification_id(id).map_err(|_| malformed());
        }
        Err(malformed())
    }

    /// The provider this identifier is scoped to, if any.
    pub fn provider(&self) -> Option<Provider> {
        match self {
            Self::ProviderScope(p) | Self::Trait { provider: p, .. } => Some(*p),
            Self::Action(_) | Self::VerificationId(_) => None,
        }
    }
}

fn check_single_line(s: &str) -> Result<(), GrammarError> {
    if s.is_empty() || s.contains(['\n', '\r']) {
        return Err(GrammarError::InvalidResourceValue(s.to_string()));
    }
    Ok(())
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderScope(p) => write!(f, "{URN_PREFIX}{PROVIDER_KIND}{p}"),
            Self::Trait {
                provider,
                requirement,
            } => write!(f, "{URN_PREFIX}{PROVIDER_KIND}{provider}:{requirement}"),
            Self::Action(a) => write!(f, "{URN_PREFIX}{ACTION_KIND}{a}"),
            Self::VerificationId(id) => write!(f, "{URN_PREFIX}{VERIFICATION_ID_KIND}{id}"),
        }
    }
}
