//! HTTP request handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use vouch_types::Timestamp;
use vouch_utils::format_duration;
use vouch_verification::{AuthorityOutcome, GateOutcome, Rejection, Submission};

use crate::{AppState, RpcError};

// ── Verify ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VerifyRequest {
    /// Name of the configured policy to check against.
    pub policy: String,
    /// The statement text exactly as signed.
    pub message: String,
    pub signature: String,
}

/// Body of a successful forward: the authority's outcome.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VerifyResponse {
    pub policy: String,
    #[serde(flatten)]
    pub outcome: AuthorityOutcome,
}

/// Body of a local rejection (HTTP 400).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RejectionResponse {
    pub policy: String,
    #[serde(flatten)]
    pub rejection: Rejection,
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VerifyRequest>,
) -> Result<Response, RpcError> {
    state.metrics.submissions.inc();

    let policy = state
        .policies
        .get(&request.policy)
        .ok_or_else(|| RpcError::UnknownPolicy(request.policy.clone()))?;
    let submission = Submission {
        message: request.message,
        signature: request.signature,
    };

    let outcome = match state.gatekeeper.submit(policy, &submission).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let e = RpcError::from(e);
            match &e {
                RpcError::Authority(_) => state.metrics.authority_errors.inc(),
                RpcError::InvalidRequest(_) => state.metrics.record_malformed(),
                _ => {}
            }
            return Err(e);
        }
    };

    match outcome {
        GateOutcome::Rejected(rejection) => {
            state.metrics.record_rejection(&rejection);
            let body = RejectionResponse {
                policy: request.policy,
                rejection,
            };
            Ok((StatusCode::BAD_REQUEST, Json(body)).into_response())
        }
        GateOutcome::Forwarded(outcome) => {
            state.metrics.record_outcome(&outcome);
            info!(policy = %request.policy, outcome = outcome.label(), "verification complete");
            let body = VerifyResponse {
                policy: request.policy,
                outcome,
            };
            Ok((StatusCode::OK, Json(body)).into_response())
        }
    }
}

// ── Health ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub policies: usize,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let uptime = state.started_at.elapsed_since(Timestamp::now());
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: format_duration(uptime),
        policies: state.policies.len(),
    })
}

// ── Metrics ──────────────────────────────────────────────────────────────

pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<Response, RpcError> {
    let body = state.metrics.gather_and_encode()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}
