//! Gateway error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use vouch_verification::{AuthorityError, VerificationError};

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("unknown policy: {0}")]
    UnknownPolicy(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("verification authority error: {0}")]
    Authority(#[from] AuthorityError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("server error: {0}")]
    Server(String),
}

impl From<VerificationError> for RpcError {
    fn from(e: VerificationError) -> Self {
        match e {
            VerificationError::Statement(e) => RpcError::InvalidRequest(e.to_string()),
            VerificationError::Authority(e) => RpcError::Authority(e),
            VerificationError::UnknownPolicy(name) => RpcError::UnknownPolicy(name),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnknownPolicy(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Authority(AuthorityError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Self::Authority(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) | Self::Metrics(_) | Self::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Authority(_) => {
                warn!(error = %self, "verification authority error");
                "verification authority unavailable".to_string()
            }
            Self::Config(_) | Self::Metrics(_) | Self::Server(_) => {
                error!(error = %self, "internal error");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
