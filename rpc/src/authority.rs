//! HTTP client for the external verification authority.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use vouch_verification::{AuthorityError, AuthorityOutcome, AuthorityRequest, VerificationAuthority};

use crate::RpcError;

/// Posts `{signature, message}` as JSON to the authority and reads back an
/// [`AuthorityOutcome`].
#[derive(Clone)]
pub struct HttpAuthority {
    http: reqwest::Client,
    url: String,
}

impl HttpAuthority {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .build()
            .map_err(|e| RpcError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// The configured authority URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl VerificationAuthority for HttpAuthority {
    async fn verify(&self, request: &AuthorityRequest) -> Result<AuthorityOutcome, AuthorityError> {
        let response = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuthorityError::Timeout
                } else {
                    AuthorityError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        debug!(url = %self.url, %status, "authority responded");
        if !status.is_success() {
            return Err(AuthorityError::UnexpectedResponse(format!("HTTP {status}")));
        }

        response
            .json::<AuthorityOutcome>()
            .await
            .map_err(|e| AuthorityError::UnexpectedResponse(format!("invalid JSON: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/verify")
    }

    fn request() -> AuthorityRequest {
        AuthorityRequest {
            signature: "0xsig".into(),
            message: "statement".into(),
        }
    }

    #[tokio::test]
    async fn reads_the_outcome() {
        let app = Router::new().route(
            "/verify",
            post(|Json(req): Json<AuthorityRequest>| async move {
                assert_eq!(req.signature, "0xsig");
                Json(serde_json::json!({ "status": "requirements_unmet" }))
            }),
        );
        let authority = HttpAuthority::new(spawn(app).await, Duration::from_secs(5)).unwrap();
        assert_eq!(
            authority.verify(&request()).await.unwrap(),
            AuthorityOutcome::RequirementsUnmet
        );
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let app = Router::new().route("/verify", post(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let authority = HttpAuthority::new(spawn(app).await, Duration::from_secs(5)).unwrap();
        assert!(matches!(
            authority.verify(&request()).await,
            Err(AuthorityError::UnexpectedResponse(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_authority_is_an_error() {
        let authority =
            HttpAuthority::new("http://127.0.0.1:1/verify", Duration::from_secs(2)).unwrap();
        assert!(authority.verify(&request()).await.is_err());
    }
}
