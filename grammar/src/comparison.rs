//! Typed comparisons and trait requirements.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::encoded::raw_comparison;
use crate::{split_operator, EncodedTrait, GrammarError, Operator, Value, ValueKind};

/// An operator applied to a typed value.
///
/// Construction enforces operator/type compatibility: `eq` accepts any value,
/// the ordering operators need an integer, and `in` always yields a string set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub operator: Operator,
    pub value: Value,
}

impl Comparison {
    /// Type a raw value under `operator`.
    pub fn new(operator: Operator, raw_value: &str) -> Result<Self, GrammarError> {
        if raw_value.is_empty() {
            return Err(GrammarError::EmptyValue);
        }
        let value = match operator {
            Operator::Eq => Value::infer_scalar(raw_value),
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte => {
                match raw_value.parse::<i64>() {
                    Ok(n) => Value::Integer(n),
                    Err(_) => {
                        return Err(GrammarError::UnsupportedOperatorForType {
                            operator,
                            kind: Value::infer_scalar(raw_value).kind(),
                            value: raw_value.to_string(),
                        })
                    }
                }
            }
            Operator::In => {
                let set = Value::parse_set(raw_value);
                if set.is_empty() {
                    return Err(GrammarError::EmptyValue);
                }
                Value::StringSet(set)
            }
        };
        Ok(Self { operator, value })
    }

    /// Parse a raw, optionally operator-prefixed comparison string (`gte:1000`, `true`).
    pub fn parse(raw: &str) -> Result<Self, GrammarError> {
        let (operator, value) = split_operator(raw);
        Self::new(operator, value)
    }

    pub fn from_encoded(encoded: &EncodedTrait) -> Result<Self, GrammarError> {
        Self::new(encoded.operator, &encoded.value)
    }

    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// Canonical raw comparison string. `parse(c.to_raw()) == c` for every
    /// comparison `c` built by this type.
    pub fn to_raw(&self) -> String {
        raw_comparison(self.operator, &self.value.to_string())
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw())
    }
}

/// A named, typed trait requirement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitRequirement {
    pub name: String,
    pub comparison: Comparison,
}

impl TraitRequirement {
    /// Parse and type-check a requirement from its name and raw comparison string.
    ///
    /// This is the optional pre-flight check: it rejects combinations such as
    /// `gt:abc` that the permissive encoder would let through.
    pub fn parse(name: &str, raw: &str) -> Result<Self, GrammarError> {
        let encoded = EncodedTrait::from_raw(name, raw)?;
        Self::from_encoded(&encoded)
    }

    pub fn from_encoded(encoded: &EncodedTrait) -> Result<Self, GrammarError> {
        Ok(Self {
            name: encoded.name.clone(),
            comparison: Comparison::from_encoded(encoded)?,
        })
    }

    pub fn operator(&self) -> Operator {
        self.comparison.operator
    }

    pub fn value(&self) -> &Value {
        &self.comparison.value
    }

    /// The wire form of this requirement, using the canonical value rendering.
    pub fn to_encoded(&self) -> EncodedTrait {
        EncodedTrait {
            name: self.name.clone(),
            operator: self.comparison.operator,
            value: self.comparison.value.to_string(),
        }
    }
}
