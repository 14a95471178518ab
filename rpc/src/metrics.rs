//! Prometheus metrics for the gateway.
//!
//! [`GatewayMetrics`] owns a dedicated [`Registry`] that the `/metrics`
//! endpoint encodes into the Prometheus text exposition format.

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry, Encoder,
    IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

use vouch_verification::{AuthorityOutcome, Rejection};

pub struct GatewayMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Submissions received on `/v1/verify`.
    pub submissions: IntCounter,
    /// Submissions refused locally, by reason (`action`, `traits`, `malformed`).
    pub rejections: IntCounterVec,
    /// Submissions forwarded to the verification authority.
    pub forwarded: IntCounter,
    /// Authority answers, by outcome class.
    pub authority_outcomes: IntCounterVec,
    /// Failed calls to the verification authority.
    pub authority_errors: IntCounter,
}

impl GatewayMetrics {
    /// Create a fresh set of metrics, all registered under a new [`Registry`].
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let submissions = register_int_counter_with_registry!(
            Opts::new("vouch_submissions_total", "Signed statements submitted for verification"),
            registry
        )?;
        let rejections = register_int_counter_vec_with_registry!(
            Opts::new(
                "vouch_local_rejections_total",
                "Submissions rejected before reaching the verification authority"
            ),
            &["reason"],
            registry
        )?;
        let forwarded = register_int_counter_with_registry!(
            Opts::new(
                "vouch_forwarded_total",
                "Submissions forwarded to the verification authority"
            ),
            registry
        )?;
        let authority_outcomes = register_int_counter_vec_with_registry!(
            Opts::new(
                "vouch_authority_outcomes_total",
                "Verification authority responses by outcome"
            ),
            &["outcome"],
            registry
        )?;
        let authority_errors = register_int_counter_with_registry!(
            Opts::new(
                "vouch_authority_errors_total",
                "Failed calls to the verification authority"
            ),
            registry
        )?;

        Ok(Self {
            registry,
            submissions,
            rejections,
            forwarded,
            authority_outcomes,
            authority_errors,
        })
    }

    pub fn record_rejection(&self, rejection: &Rejection) {
        let reason = match rejection {
            Rejection::ProviderScopeMissing { .. } => "scope",
            Rejection::DuplicateTrait { .. } | Rejection::DuplicateAction => "duplicate",
            Rejection::ActionMismatch { .. } => "action",
            Rejection::Traits(_) => "traits",
        };
        self.rejections.with_label_values(&[reason]).inc();
    }

    pub fn record_malformed(&self) {
        self.rejections.with_label_values(&["malformed"]).inc();
    }

    pub fn record_outcome(&self, outcome: &AuthorityOutcome) {
        self.forwarded.inc();
        self.authority_outcomes
            .with_label_values(&[outcome.label()])
            .inc();
    }

    /// Gather all metrics and encode to Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_verification::ValidationResult;

    #[test]
    fn counters_appear_in_text_output() {
        let metrics = GatewayMetrics::new().unwrap();
        metrics.submissions.inc();
        metrics.record_rejection(&Rejection::Traits(ValidationResult::from_mismatches(Vec::new())));
        metrics.record_outcome(&AuthorityOutcome::RequirementsUnmet);

        let text = metrics.gather_and_encode().unwrap();
        assert!(text.contains("vouch_submissions_total 1"));
        assert!(text.contains(r#"vouch_local_rejections_total{reason="traits"} 1"#));
        assert!(text.contains(r#"vouch_authority_outcomes_total{outcome="requirements_unmet"} 1"#));
        assert!(text.contains("vouch_forwarded_total 1"));
    }

    #[test]
    fn ambiguous_and_unscoped_statements_have_their_own_labels() {
        let metrics = GatewayMetrics::new().unwrap();
        metrics.record_rejection(&Rejection::DuplicateTrait {
            name: "followers".into(),
        });
        metrics.record_rejection(&Rejection::DuplicateAction);
        metrics.record_rejection(&Rejection::ProviderScopeMissing {
            provider: vouch_types::Provider::Twitter,
        });

        let text = metrics.gather_and_encode().unwrap();
        assert!(text.contains(r#"vouch_local_rejections_total{reason="duplicate"} 2"#));
        assert!(text.contains(r#"vouch_local_rejections_total{reason="scope"} 1"#));
    }
}
