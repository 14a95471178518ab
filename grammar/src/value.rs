//! Typed trait values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A trait value after type inference.
///
/// `StringSet` is only produced for the `in` operator. Its canonical form is
/// the members sorted and joined with `,`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    String(String),
    StringSet(BTreeSet<String>),
}

/// The kind of a [`Value`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Boolean,
    Integer,
    String,
    StringSet,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Integer(_) => ValueKind::Integer,
            Self::String(_) => ValueKind::String,
            Self::StringSet(_) => ValueKind::StringSet,
        }
    }

    /// Infer the value of an `eq` comparison: booleans, then integers, then strings.
    pub fn infer_scalar(raw: &str) -> Self {
        match raw {
            "true" => Self::Boolean(true),
            "false" => Self::Boolean(false),
            _ => match raw.parse::<i64>() {
                Ok(n) => Self::Integer(n),
                Err(_) => Self::String(raw.to_string()),
            },
        }
    }

    /// Split an `in` list. Members are trimmed and empty members dropped.
    pub fn parse_set(raw: &str) -> BTreeSet<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::String => "string",
            Self::StringSet => "string set",
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::StringSet(set) => {
                let mut first = true;
                for member in set {
                    if !first {
                        f.write_str(",")?;
                    }
                    f.write_str(member)?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}
