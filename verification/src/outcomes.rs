//! Validation results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why one expected trait was not satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchReason {
    /// The statement carries no requirement for this trait.
    Missing,
    /// The statement's requirement admits values the expected one does not.
    Looser,
    /// The two requirements constrain different kinds of value.
    KindConflict,
    /// The statement pairs an operator with a value it cannot apply to.
    UnsupportedOperatorForType,
    /// The relying party's own expectation does not type-check.
    InvalidExpectation,
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Missing => "missing from statement",
            Self::Looser => "looser than expected",
            Self::KindConflict => "value kind differs",
            Self::UnsupportedOperatorForType => "operator unsupported for value",
            Self::InvalidExpectation => "invalid expectation",
        };
        f.write_str(s)
    }
}

/// One unsatisfied expectation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub expected: String,
    /// `None` when the trait is absent from the statement.
    pub found: Option<String>,
    pub reason: MismatchReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Mismatch {
    pub fn missing(name: &str, expected: &str) -> Self {
        Self {
            trait_name: name.to_string(),
            expected: expected.to_string(),
            found: None,
            reason: MismatchReason::Missing,
            detail: None,
        }
    }
}

/// Outcome of comparing found traits against expected ones.
///
/// `valid` is true iff `mismatches` is empty. Every unsatisfied expectation is
/// listed, in the order the expectations were given.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub mismatches: Vec<Mismatch>,
}

impl ValidationResult {
    pub fn from_mismatches(mismatches: Vec<Mismatch>) -> Self {
        Self {
            valid: mismatches.is_empty(),
            mismatches,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The mismatch for `name`, if any.
    pub fn mismatch(&self, name: &str) -> Option<&Mismatch> {
        self.mismatches.iter().find(|m| m.trait_name == name)
    }
}
