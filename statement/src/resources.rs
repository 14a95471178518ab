//! Resource parser: recovers trait requirements, action and verification id
//! from a statement's resource lines.
//!
//! The parser never fails on a bad line. Malformed trait lines are dropped so
//! that the comparator reports the trait as missing; lines for other providers
//! or unknown identifier kinds are skipped. Only empty statement text is an
//! error.
//!
//! Only the contiguous `- ` lines directly after the `Resources:` tag are
//! resource lines. A `- urn:verify:...` line anywhere else, such as the free
//! text statement line, is not a resource and is never read.
//!
//! Duplicates: if the same trait name appears more than once for the target
//! provider, the LAST occurrence wins. The same holds for the action and the
//! verification id. Last-wins alone does not stop a weaker line placed before
//! a stricter one, and another reader may resolve duplicates differently, so
//! every repeated trait name and action is recorded on the [`ResourceScan`]
//! for callers that must refuse ambiguous statements.

use tracing::{debug, warn};

use vouch_grammar::{GrammarError, ResourceId};
use vouch_types::Provider;

use crate::statement::RESOURCES_TAG;
use crate::{StatementError, TraitMap};

/// Leading marker of a resource line inside a statement.
pub const RESOURCE_LINE_MARKER: &str = "- ";

/// Everything one pass over the resource lines found for a target provider.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceScan {
    /// Trait name → raw comparison string, in first-seen order.
    pub traits: TraitMap,
    pub action: Option<String>,
    pub verification_id: Option<String>,
    /// Providers that appear as bare scope markers, in order of appearance.
    pub scoped_providers: Vec<Provider>,
    /// Trait lines for the target provider that were dropped as malformed.
    pub dropped_lines: usize,
    /// Trait names that appeared more than once for the target provider.
    pub duplicate_traits: Vec<String>,
    /// Action lines beyond the first.
    pub duplicate_actions: usize,
}

impl ResourceScan {
    /// Whether the statement carries the bare scope marker for `provider`.
    pub fn is_scoped_to(&self, provider: Provider) -> bool {
        self.scoped_providers.contains(&provider)
    }

    /// Whether any trait name or the action was declared more than once.
    pub fn has_duplicates(&self) -> bool {
        !self.duplicate_traits.is_empty() || self.duplicate_actions > 0
    }
}

/// Scan the resource section of the full statement text.
///
/// Everything up to and including the first `Resources:` line is skipped, and
/// the scan stops at the first line after it that lacks the `- ` marker. Text
/// without a resource section has no resources.
pub fn scan_resources(text: &str, provider: Provider) -> Result<ResourceScan, StatementError> {
    if text.trim().is_empty() {
        return Err(StatementError::Empty);
    }
    let lines = text
        .lines()
        .skip_while(|line| *line != RESOURCES_TAG)
        .skip(1)
        .map_while(|line| line.strip_prefix(RESOURCE_LINE_MARKER));
    Ok(scan_lines(lines, provider))
}

/// Trait requirements the statement declares for `provider`.
pub fn parse_traits(text: &str, provider: Provider) -> Result<TraitMap, StatementError> {
    scan_resources(text, provider).map(|scan| scan.traits)
}

/// The action named by the statement, if any.
pub fn extract_action(text: &str) -> Result<Option<String>, StatementError> {
    scan_resources(text, Provider::Twitter).map(|scan| scan.action)
}

/// The verification id carried by the statement, if any.
pub fn extract_verification_id(text: &str) -> Result<Option<String>, StatementError> {
    scan_resources(text, Provider::Twitter).map(|scan| scan.verification_id)
}

/// Scan resource identifiers that have already had their line marker removed.
pub(crate) fn scan_lines<'a>(lines: impl Iterator<Item = &'a str>, provider: Provider) -> ResourceScan {
    let mut scan = ResourceScan::default();
    let trait_prefix = format!("{}:", ResourceId::ProviderScope(provider));

    for resource in lines {
        match ResourceId::parse(resource) {
            Ok(ResourceId::Trait {
                provider: p,
                requirement,
            }) if p == provider => {
                let raw = requirement.raw_comparison();
                if let Some(previous) = scan.traits.insert(requirement.name.clone(), raw) {
                    if !scan.duplicate_traits.contains(&requirement.name) {
                        scan.duplicate_traits.push(requirement.name.clone());
                    }
                    warn!(
                        provider = %provider,
                        name = %requirement.name,
                        previous = %previous,
                        "duplicate trait line; the later one takes effect"
                    );
                }
            }
            Ok(ResourceId::ProviderScope(p)) => {
                if !scan.scoped_providers.contains(&p) {
                    scan.scoped_providers.push(p);
                }
            }
            Ok(ResourceId::Action(action)) => {
                if let Some(previous) = scan.action.replace(action) {
                    scan.duplicate_actions += 1;
                    warn!(%previous, "duplicate action line; the later one takes effect");
                }
            }
            Ok(ResourceId::VerificationId(id)) => {
                if let Some(previous) = scan.verification_id.replace(id) {
                    warn!(%previous, "duplicate verification id line; the later one takes effect");
                }
            }
            Ok(ResourceId::Trait { provider: p, .. }) => {
                debug!(provider = %p, "skipping trait for another provider");
            }
            Err(GrammarError::MalformedResourceLine(_)) if resource.starts_with(&trait_prefix) => {
                scan.dropped_lines += 1;
                warn!(provider = %provider, line = resource, "dropping malformed trait line");
            }
            Err(e) => {
                debug!(line = resource, error = %e, "skipping unrecognised resource line");
            }
        }
    }
    scan
}
