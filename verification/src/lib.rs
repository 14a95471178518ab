//! Trait verification on the trusted side.
//!
//! Two stages, always in this order:
//! 1. **Local validation**: the trait requirements recovered from the signed
//!    statement are compared against the relying party's own expectations
//!    ([`validate`]). A statement passes only if every requirement it carries
//!    is at least as strict as the expected one.
//! 2. **Forwarding**: only a statement that passed stage 1 is sent, together
//!    with its signature, to the external [`VerificationAuthority`].
//!
//! [`Gatekeeper`] enforces the ordering.

pub mod authority;
pub mod comparator;
pub mod error;
pub mod gatekeeper;
pub mod outcomes;
pub mod policy;

pub use authority::{AuthorityOutcome, AuthorityRequest, VerificationAuthority};
pub use comparator::{compare, validate, Constraint};
pub use error::{AuthorityError, VerificationError};
pub use gatekeeper::{GateOutcome, Gatekeeper, Rejection, Submission};
pub use outcomes::{Mismatch, MismatchReason, ValidationResult};
pub use policy::TraitPolicy;
