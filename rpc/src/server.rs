//! Axum-based gateway server.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use vouch_types::Timestamp;
use vouch_verification::{Gatekeeper, TraitPolicy, VerificationAuthority};

use crate::{handlers, GatewayMetrics, RpcError};

/// State shared by every request handler.
pub struct AppState {
    pub gatekeeper: Gatekeeper,
    pub policies: BTreeMap<String, TraitPolicy>,
    pub metrics: GatewayMetrics,
    pub started_at: Timestamp,
}

impl AppState {
    pub fn new(
        authority: Arc<dyn VerificationAuthority>,
        policies: BTreeMap<String, TraitPolicy>,
    ) -> Result<Self, RpcError> {
        Ok(Self {
            gatekeeper: Gatekeeper::new(authority),
            policies,
            metrics: GatewayMetrics::new()?,
            started_at: Timestamp::now(),
        })
    }
}

/// Build the gateway router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/verify", post(handlers::verify))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The gateway server, configured with a bind address and shared state.
pub struct GatewayServer {
    pub host: String,
    pub port: u16,
    pub state: Arc<AppState>,
}

impl GatewayServer {
    pub fn new(host: impl Into<String>, port: u16, state: Arc<AppState>) -> Self {
        Self {
            host: host.into(),
            port,
            state,
        }
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn start(&self) -> Result<(), RpcError> {
        let app = router(self.state.clone());
        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(format!("failed to bind {addr}: {e}")))?;
        info!(%addr, policies = self.state.policies.len(), "gateway listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        info!("gateway stopped");
        Ok(())
    }
}

/// Resolve on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use vouch_nullables::NullAuthority;
    use vouch_statement::{StatementBuilder, StatementRequest};
    use vouch_types::{Identity, Provider, StatementParams};
    use vouch_verification::AuthorityOutcome;

    fn policies() -> BTreeMap<String, TraitPolicy> {
        let policy = TraitPolicy::new(Provider::Twitter)
            .with_action("airdrop")
            .require("followers", "gte:1000");
        BTreeMap::from([("airdrop".to_string(), policy)])
    }

    fn test_app(authority: Arc<NullAuthority>) -> Router {
        router(Arc::new(AppState::new(authority, policies()).unwrap()))
    }

    fn statement(followers: &str) -> String {
        let identity = Identity::new("0x8ba1f109551bD432803012645Ac136ddd64DBA72").unwrap();
        let request = StatementRequest::for_provider(Provider::Twitter)
            .with_trait("followers", followers)
            .with_action("airdrop");
        StatementBuilder::new(StatementParams::default())
            .build(&identity, &request)
            .unwrap()
            .text
    }

    fn verify_request(policy: &str, message: &str) -> Request<Body> {
        let body = serde_json::json!({
            "policy": policy,
            "message": message,
            "signature": "0xsig",
        });
        Request::builder()
            .method("POST")
            .uri("/v1/verify")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn satisfied_policy_is_forwarded() {
        let authority = Arc::new(NullAuthority::returning(AuthorityOutcome::Verified {
            token: Some("tok".into()),
        }));
        let app = test_app(authority.clone());

        let resp = app
            .oneshot(verify_request("airdrop", &statement("gte:5000")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "verified");
        assert_eq!(json["token"], "tok");
        assert_eq!(json["policy"], "airdrop");
        assert_eq!(authority.call_count(), 1);
    }

    #[tokio::test]
    async fn weakened_statement_returns_400_with_mismatches() {
        let authority = Arc::new(NullAuthority::returning(AuthorityOutcome::NotVerified));
        let app = test_app(authority.clone());

        let resp = app
            .oneshot(verify_request("airdrop", &statement("gte:10")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["rejection"], "traits");
        assert_eq!(json["valid"], false);
        assert_eq!(json["mismatches"][0]["trait"], "followers");
        assert_eq!(json["mismatches"][0]["found"], "gte:10");
        assert_eq!(authority.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_policy_is_404() {
        let app = test_app(Arc::new(NullAuthority::returning(AuthorityOutcome::NotVerified)));
        let resp = app
            .oneshot(verify_request("lottery", &statement("gte:5000")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_message_is_400() {
        let app = test_app(Arc::new(NullAuthority::returning(AuthorityOutcome::NotVerified)));
        let resp = app.oneshot(verify_request("airdrop", "")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await["error"].is_string());
    }

    #[tokio::test]
    async fn authority_failure_is_502() {
        let app = test_app(Arc::new(NullAuthority::failing(
            vouch_verification::AuthorityError::Unreachable("down".into()),
        )));
        let resp = app
            .oneshot(verify_request("airdrop", &statement("gte:5000")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn health_reports_policies() {
        let app = test_app(Arc::new(NullAuthority::returning(AuthorityOutcome::NotVerified)));
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["policies"], 1);
    }

    #[tokio::test]
    async fn metrics_count_rejections() {
        let state = Arc::new(
            AppState::new(
                Arc::new(NullAuthority::returning(AuthorityOutcome::NotVerified)),
                policies(),
            )
            .unwrap(),
        );
        let app = router(state.clone());
        app.clone()
            .oneshot(verify_request("airdrop", &statement("gte:10")))
            .await
            .unwrap();

        let resp = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains(r#"vouch_local_rejections_total{reason="traits"} 1"#));
        assert_eq!(state.metrics.submissions.get(), 1);
    }
}
