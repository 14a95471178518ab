use thiserror::Error;

use crate::{Operator, ValueKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("malformed resource line: {0}")]
    MalformedResourceLine(String),

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("operator {operator} does not apply to {kind} value {value:?}")]
    UnsupportedOperatorForType {
        operator: Operator,
        kind: ValueKind,
        value: String,
    },

    #[error("empty value")]
    EmptyValue,

    #[error("invalid trait name: {0:?}")]
    InvalidTraitName(String),

    #[error("invalid resource value: {0:?}")]
    InvalidResourceValue(String),

    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}
