//! Wire form of one trait requirement: `{name}:{operator}:{value}`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{GrammarError, Operator};

/// Split an operator prefix off a raw comparison string.
///
/// `gte:1000` yields `(Gte, "1000")`. A string without a recognised operator
/// prefix, or with nothing after the colon, is an `eq` comparison against the
/// whole string: `true` yields `(Eq, "true")` and `gt:` yields `(Eq, "gt:")`.
pub fn split_operator(raw: &str) -> (Operator, &str) {
    if let Some((head, rest)) = raw.split_once(':') {
        if !rest.is_empty() {
            if let Ok(op) = head.parse::<Operator>() {
                return (op, rest);
            }
        }
    }
    (Operator::Eq, raw)
}

/// One trait requirement as it appears inside a resource identifier.
///
/// The value is kept as the raw string: nothing here checks that the operator
/// makes sense for the value. That check happens when the requirement is
/// typed (see [`crate::Comparison`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedTrait {
    pub name: String,
    pub operator: Operator,
    pub value: String,
}

impl EncodedTrait {
    /// Encode a trait from its name and a raw, optionally operator-prefixed value.
    ///
    /// Rejects input that could not be decoded back to the same trait: an empty
    /// or colon-bearing name, whitespace in the name, an empty value, or a line
    /// break anywhere.
    pub fn from_raw(name: &str, raw: &str) -> Result<Self, GrammarError> {
        validate_name(name)?;
        if raw.is_empty() {
            return Err(GrammarError::EmptyValue);
        }
        if raw.contains(['\n', '\r']) {
            return Err(GrammarError::InvalidResourceValue(raw.to_string()));
        }
        let (operator, value) = split_operator(raw);
        Ok(Self {
            name: name.to_string(),
            operator,
            value: value.to_string(),
        })
    }

    /// Decode the `{name}:{operator}:{value}` body of a trait identifier.
    ///
    /// Everything after the second colon is the value, so `in` lists and values
    /// containing `:` survive intact.
    pub fn decode(body: &str) -> Result<Self, GrammarError> {
        let malformed = || GrammarError::MalformedResourceLine(body.to_string());
        let mut parts = body.splitn(3, ':');
        let name = parts.next().filter(|n| !n.is_empty()).ok_or_else(malformed)?;
        let operator = parts.next().ok_or_else(malformed)?;
        let value = parts.next().filter(|v| !v.is_empty()).ok_or_else(malformed)?;
        let operator = operator.parse::<Operator>().map_err(|_| malformed())?;
        Ok(Self {
            name: name.to_string(),
            operator,
            value: value.to_string(),
        })
    }

    /// The canonical raw comparison string for this trait.
    ///
    /// `eq` comparisons are written bare (`true`) unless the bare value would
    /// itself read as operator-prefixed, in which case `eq:` is kept so the
    /// string cannot be reinterpreted (`eq:gte:5` stays `eq:gte:5`).
    pub fn raw_comparison(&self) -> String {
        raw_comparison(self.operator, &self.value)
    }
}

pub(crate) fn raw_comparison(operator: Operator, value: &str) -> String {
    if operator == Operator::Eq && split_operator(value).0 == Operator::Eq && !value.is_empty() {
        value.to_string()
    } else {
        format!("{operator}:{value}")
    }
}

fn validate_name(name: &str) -> Result<(), GrammarError> {
    if name.is_empty() || name.contains(':') || name.chars().any(char::is_whitespace) {
        return Err(GrammarError::InvalidTraitName(name.to_string()));
    }
    Ok(())
}

impl fmt::Display for EncodedTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.name, self.operator, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_prefix_is_split() {
        assert_eq!(split_operator("gte:1000"), (Operator::Gte, "1000"));
        assert_eq!(split_operator("gt:5"), (Operator::Gt, "5"));
        assert_eq!(split_operator("in:US,CA"), (Operator::In, "US,CA"));
    }

    #[test]
    fn missing_prefix_defaults_to_eq() {
        assert_eq!(split_operator("true"), (Operator::Eq, "true"));
        assert_eq!(split_operator("gt:"), (Operator::Eq, "gt:"));
        assert_eq!(split_operator("foo:bar"), (Operator::Eq, "foo:bar"));
    }

    #[test]
    fn encode_formats_name_operator_value() {
        let t = EncodedTrait::from_raw("followers", "gte:1000").unwrap();
        assert_eq!(t.to_string(), "followers:gte:1000");
        let t = EncodedTrait::from_raw("verified", "true").unwrap();
        assert_eq!(t.to_string(), "verified:eq:true");
    }

    #[test]
    fn encode_is_permissive_about_types() {
        let t = EncodedTrait::from_raw("handle", "gt:abc").unwrap();
        assert_eq!(t.to_string(), "handle:gt:abc");
    }

    #[test]
    fn encode_rejects_undecodable_input() {
        assert!(EncodedTrait::from_raw("", "true").is_err());
        assert!(EncodedTrait::from_raw("a:b", "true").is_err());
        assert!(EncodedTrait::from_raw("a b", "true").is_err());
        assert_eq!(EncodedTrait::from_raw("a", ""), Err(GrammarError::EmptyValue));
        assert!(EncodedTrait::from_raw("a", "x\n- urn:verify:action:y").is_err());
    }

    #[test]
    fn decode_keeps_colons_in_value() {
        let t = EncodedTrait::decode("bio:eq:a:b:c").unwrap();
        assert_eq!(t.name, "bio");
        assert_eq!(t.operator, Operator::Eq);
        assert_eq!(t.value, "a:b:c");
    }

    #[test]
    fn decode_rejects_malformed_bodies() {
        for body in ["followers", "followers:gte", "followers:gte:", ":gte:5", "followers:about:5"] {
            assert!(
                matches!(EncodedTrait::decode(body), Err(GrammarError::MalformedResourceLine(_))),
                "{body} should be malformed"
            );
        }
    }

    #[test]
    fn raw_comparison_is_canonical() {
        let t = EncodedTrait::decode("verified:eq:true").unwrap();
        assert_eq!(t.raw_comparison(), "true");
        let t = EncodedTrait::decode("followers:gte:1000").unwrap();
        assert_eq!(t.raw_comparison(), "gte:1000");
        let t = EncodedTrait::decode("followers:eq:gte:5000").unwrap();
        assert_eq!(t.raw_comparison(), "eq:gte:5000");
    }
}
