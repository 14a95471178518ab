use thiserror::Error;

use vouch_grammar::GrammarError;
use vouch_types::TypesError;

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("statement text is empty")]
    Empty,

    #[error("statement is missing {0}")]
    MissingField(&'static str),

    #[error("malformed {field}: {value:?}")]
    MalformedField { field: &'static str, value: String },

    #[error("{field} must be a single non-empty line: {value:?}")]
    InvalidParam { field: &'static str, value: String },

    #[error("trait requirements need a provider")]
    TraitsWithoutProvider,

    #[error("invalid trait {name:?}: {source}")]
    InvalidTrait {
        name: String,
        #[source]
        source: GrammarError,
    },

    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Types(#[from] TypesError),
}
