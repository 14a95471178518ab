//! Validate-then-forward.
//!
//! The gatekeeper is the only path from a client submission to the external
//! authority. A submission reaches the authority only after its statement has
//! been parsed in full, is scoped to the policy's provider, declares no trait
//! or action twice, and satisfies every expected trait. Resource lines are
//! read only from the statement's resource section.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use vouch_statement::Statement;
use vouch_types::Provider;

use crate::{
    validate, AuthorityOutcome, AuthorityRequest, TraitPolicy, ValidationResult,
    VerificationAuthority, VerificationError,
};

/// A signed statement as submitted by a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub message: String,
    pub signature: String,
}

/// Why a submission was refused without contacting the authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rejection", rename_all = "snake_case")]
pub enum Rejection {
    /// The statement lacks the bare scope marker for the policy's provider.
    ProviderScopeMissing { provider: Provider },
    /// A trait name appears more than once for the policy's provider.
    DuplicateTrait { name: String },
    /// More than one action line.
    DuplicateAction,
    /// The statement names a different action than the policy, or none.
    ActionMismatch {
        expected: String,
        found: Option<String>,
    },
    /// One or more expected traits are missing or weaker than required.
    Traits(ValidationResult),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    Rejected(Rejection),
    Forwarded(AuthorityOutcome),
}

pub struct Gatekeeper {
    authority: Arc<dyn VerificationAuthority>,
}

impl Gatekeeper {
    pub fn new(authority: Arc<dyn VerificationAuthority>) -> Self {
        Self { authority }
    }

    /// Local checks only. `Ok(None)` means the submission may be forwarded.
    pub fn check(
        &self,
        policy: &TraitPolicy,
        message: &str,
    ) -> Result<Option<Rejection>, VerificationError> {
        let scan = Statement::parse(message)?.scan(policy.provider);

        if !scan.is_scoped_to(policy.provider) {
            return Ok(Some(Rejection::ProviderScopeMissing {
                provider: policy.provider,
            }));
        }
        if let Some(name) = scan.duplicate_traits.first() {
            return Ok(Some(Rejection::DuplicateTrait { name: name.clone() }));
        }
        if scan.duplicate_actions > 0 {
            return Ok(Some(Rejection::DuplicateAction));
        }
        if let Some(expected) = &policy.action {
            if scan.action.as_ref() != Some(expected) {
                return Ok(Some(Rejection::ActionMismatch {
                    expected: expected.clone(),
                    found: scan.action,
                }));
            }
        }

        let result = validate(&scan.traits, &policy.expected);
        if !result.valid {
            return Ok(Some(Rejection::Traits(result)));
        }
        Ok(None)
    }

    /// Check `submission` against `policy` and forward it only if it passes.
    pub async fn submit(
        &self,
        policy: &TraitPolicy,
        submission: &Submission,
    ) -> Result<GateOutcome, VerificationError> {
        if let Some(rejection) = self.check(policy, &submission.message)? {
            info!(provider = %policy.provider, ?rejection, "rejected before forwarding");
            return Ok(GateOutcome::Rejected(rejection));
        }

        let request = AuthorityRequest {
            signature: submission.signature.clone(),
            message: submission.message.clone(),
        };
        let outcome = self.authority.verify(&request).await.map_err(|e| {
            warn!(provider = %policy.provider, error = %e, "verification authority failed");
            e
        })?;
        info!(provider = %policy.provider, outcome = outcome.label(), "forwarded to authority");
        Ok(GateOutcome::Forwarded(outcome))
    }
}
