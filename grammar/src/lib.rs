//! Trait requirement grammar.
//!
//! A trait requirement is a named, operator-qualified constraint on a provider
//! account (`followers:gte:1000`, `verified:eq:true`, `country:in:US,CA`).
//! Requirements travel inside signable statements as resource identifiers:
//!
//! ```text
//! urn:verify:provider:{provider}                              scope marker
//! urn:verify:provider:{provider}:{name}:{operator}:{value}    one requirement
//! urn:verify:action:{action}
//! urn:verify:verificationid:{id}
//! ```
//!
//! Two layers are provided:
//! - [`EncodedTrait`]: the untyped wire form. Encoding is permissive: an
//!   operator/value combination that makes no sense (`gt:abc`) still encodes.
//! - [`Comparison`] / [`TraitRequirement`]: the typed form, where values are
//!   [`Value`]s and operator/type compatibility has been checked.
//!
//! [`ResourceId`] is the single serializer/deserializer pair for resource
//! identifiers, shared by the statement builder and the resource parser.

pub mod comparison;
pub mod encoded;
pub mod error;
pub mod operator;
pub mod resource;
pub mod value;

pub use comparison::{Comparison, TraitRequirement};
pub use encoded::{split_operator, EncodedTrait};
pub use error::GrammarError;
pub use operator::Operator;
pub use resource::{ResourceId, URN_PREFIX};
pub use value::{Value, ValueKind};
