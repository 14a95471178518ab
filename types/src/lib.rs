//! Fundamental types for vouch.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! wallet identities, identity providers, timestamps and clocks, and the
//! parameters that shape a signable statement.

pub mod error;
pub mod identity;
pub mod params;
pub mod provider;
pub mod time;

pub use error::TypesError;
pub use identity::Identity;
pub use params::{StatementParams, DEFAULT_SIGNATURE_TTL_SECS, DEFAULT_STATEMENT_TTL_SECS};
pub use provider::Provider;
pub use time::{Clock, SystemClock, Timestamp};
