//! Identity providers whose account ownership can be proven.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// An external identity platform a wallet can link an account from.
///
/// The lowercase name is the token used inside resource identifiers
/// (`urn:verify:provider:{name}`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Twitter,
    Github,
    Discord,
    Telegram,
    Farcaster,
    Google,
    Linkedin,
    Coinbase,
}

impl Provider {
    /// Every supported provider, in declaration order.
    pub const ALL: [Provider; 8] = [
        Self::Twitter,
        Self::Github,
        Self::Discord,
        Self::Telegram,
        Self::Farcaster,
        Self::Google,
        Self::Linkedin,
        Self::Coinbase,
    ];

    /// Resource-identifier name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Github => "github",
            Self::Discord => "discord",
            Self::Telegram => "telegram",
            Self::Farcaster => "farcaster",
            Self::Google => "google",
            Self::Linkedin => "linkedin",
            Self::Coinbase => "coinbase",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| TypesError::UnknownProvider(s.to_string()))
    }
}
