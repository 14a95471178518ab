//! Signable statements.
//!
//! The [`StatementBuilder`] turns a provider, an ordered set of trait
//! requirements, an action and an optional verification id into one canonical
//! multi-line statement for a wallet to sign. The resource parser
//! ([`parse_traits`], [`scan_resources`]) reads the same statement back on the
//! trusted side and recovers the trait requirements it actually carries.
//!
//! ```text
//! app.example.com wants you to sign in with your Ethereum account:
//! 0x8ba1f109551bD432803012645Ac136ddd64DBA72
//!
//! Verify account ownership and eligibility requirements.
//!
//! URI: https://app.example.com
//! Version: 1
//! Chain ID: 1
//! Nonce: q8Xn2LpV0aZr7TtYc
//! Issued At: 2024-05-01T12:00:00Z
//! Expiration Time: 2024-05-01T18:00:00Z
//! Resources:
//! - urn:verify:provider:twitter
//! - urn:verify:provider:twitter:followers:gte:1000
//! - urn:verify:action:airdrop
//! ```

pub mod builder;
pub mod error;
pub mod nonce;
pub mod resources;
pub mod statement;

use indexmap::IndexMap;

pub use builder::{BuiltStatement, StatementBuilder, StatementRequest};
pub use error::StatementError;
pub use nonce::{generate_nonce, NONCE_LEN};
pub use resources::{
    extract_action, extract_verification_id, parse_traits, scan_resources, ResourceScan,
    RESOURCE_LINE_MARKER,
};
pub use statement::Statement;

/// Trait name → raw comparison string, in insertion order.
pub type TraitMap = IndexMap<String, String>;
