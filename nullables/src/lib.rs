//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the verification flow (clock, wallet signer,
//! verification authority) sits behind a trait. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod authority;
pub mod clock;
pub mod signer;

pub use authority::NullAuthority;
pub use clock::NullClock;
pub use signer::NullSigner;
