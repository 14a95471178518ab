use thiserror::Error;

use vouch_statement::StatementError;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("statement error: {0}")]
    Statement(#[from] StatementError),

    #[error("user rejected the signature request")]
    Rejected,

    #[error("signing error: {0}")]
    Signing(String),
}
