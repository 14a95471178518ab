//! HTTP gateway for trait-gated verification.
//!
//! Provides endpoints for:
//! - Submitting a signed statement against a named policy (`POST /v1/verify`)
//! - Liveness (`GET /health`)
//! - Prometheus metrics (`GET /metrics`)
//!
//! A submission whose statement does not satisfy the policy is answered with
//! `400` and the mismatch list; the verification authority is only called for
//! submissions that pass.

pub mod authority;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;

pub use authority::HttpAuthority;
pub use config::GatewayConfig;
pub use error::RpcError;
pub use metrics::GatewayMetrics;
pub use server::{router, AppState, GatewayServer};
