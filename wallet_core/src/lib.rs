//! Wallet-side signing.
//!
//! - [`Signer`]: the external wallet that signs statement text.
//! - [`SignatureCache`]: short-lived cache of signatures keyed by identity and
//!   action, so a user is not prompted again for the same use case.
//! - [`SigningSession`]: one user session, owning its cache and applying the
//!   invalidation rules.
//!
//! The cache is a latency optimisation only. Nothing on the verification side
//! consults it.

pub mod cache;
pub mod error;
pub mod session;
pub mod signer;

pub use cache::{CachedSignature, SignatureCache};
pub use error::WalletError;
pub use session::{SignedStatement, SigningSession};
pub use signer::Signer;
