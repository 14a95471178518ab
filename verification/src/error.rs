use thiserror::Error;

use vouch_statement::StatementError;

/// Failure talking to the external verification authority.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    #[error("authority unreachable: {0}")]
    Unreachable(String),

    #[error("authority timed out")]
    Timeout,

    #[error("unexpected authority response: {0}")]
    UnexpectedResponse(String),
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("statement error: {0}")]
    Statement(#[from] StatementError),

    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error("unknown policy: {0}")]
    UnknownPolicy(String),
}
