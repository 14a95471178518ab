//! Error type for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("identity must not be empty")]
    EmptyIdentity,

    #[error("identity must not contain whitespace: {0:?}")]
    InvalidIdentity(String),

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
