//! Strictness comparison of trait requirements.
//!
//! A found requirement satisfies an expected one when every account that
//! passes the found requirement also passes the expected one. Each typed
//! comparison is lowered to a [`Constraint`] describing the set of values it
//! admits, and satisfaction is set inclusion:
//!
//! | comparison        | admitted values                  |
//! |-------------------|----------------------------------|
//! | `eq:true`         | `{true}`                         |
//! | `eq:n`            | `[n, n]`                         |
//! | `gt:n` / `gte:n`  | `[n+1, MAX]` / `[n, MAX]`        |
//! | `lt:n` / `lte:n`  | `[MIN, n-1]` / `[MIN, n]`        |
//! | `eq:s`            | `{s}`                            |
//! | `in:a,b`          | `{a, b}`                         |
//!
//! `in` is therefore satisfied by any subset of the expected list, including
//! an `eq` on one of its members. An integer or boolean `eq` is compared with a
//! string set by its canonical text (`eq:5` against `in:5,6`).
//!
//! A found requirement that admits nothing (`lt:-9223372036854775808`) is
//! stricter than anything of the same kind and passes.

use std::collections::BTreeSet;

use tracing::debug;

use vouch_grammar::{Comparison, Operator, Value, ValueKind};
use vouch_statement::TraitMap;

use crate::{Mismatch, MismatchReason, ValidationResult};

/// The set of values a comparison admits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    Boolean(bool),
    /// Inclusive bounds within the `i64` domain. Widened to `i128` so that
    /// `gt:i64::MAX` is representable, as an empty range.
    Range { lo: i128, hi: i128 },
    Strings(BTreeSet<String>),
}

impl Constraint {
    pub fn from_comparison(comparison: &Comparison) -> Self {
        match (&comparison.value, comparison.operator) {
            (Value::Boolean(b), _) => Self::Boolean(*b),
            (Value::Integer(n), op) => {
                let (min, max) = (i128::from(i64::MIN), i128::from(i64::MAX));
                let n = i128::from(*n);
                let (lo, hi) = match op {
                    Operator::Gt => (n + 1, max),
                    Operator::Gte => (n, max),
                    Operator::Lt => (min, n - 1),
                    Operator::Lte => (min, n),
                    Operator::Eq | Operator::In => (n, n),
                };
                Self::Range { lo, hi }
            }
            (Value::String(s), _) => Self::Strings(BTreeSet::from([s.clone()])),
            (Value::StringSet(set), _) => Self::Strings(set.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Boolean(_) => false,
            Self::Range { lo, hi } => lo > hi,
            Self::Strings(set) => set.is_empty(),
        }
    }

    /// A single admitted value as text, for comparing against string sets.
    fn as_strings(&self) -> Option<BTreeSet<String>> {
        match self {
            Self::Boolean(b) => Some(BTreeSet::from([b.to_string()])),
            Self::Range { lo, hi } if lo == hi => Some(BTreeSet::from([lo.to_string()])),
            Self::Range { .. } => None,
            Self::Strings(set) => Some(set.clone()),
        }
    }

    /// Whether every value admitted by `self` is admitted by `other`.
    /// `None` when the two constrain different kinds of value.
    pub fn implies(&self, other: &Constraint) -> Option<bool> {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => Some(a == b),
            (Self::Range { lo, hi }, Self::Range { lo: elo, hi: ehi }) => {
                Some(self.is_empty() || (elo <= lo && hi <= ehi))
            }
            (Self::Strings(found), Self::Strings(expected)) => Some(found.is_subset(expected)),
            (_, Self::Strings(expected)) => {
                self.as_strings().map(|found| found.is_subset(expected))
            }
            _ => None,
        }
    }
}

/// Compare one found raw comparison against one expected raw comparison.
///
/// Returns the reason for rejection, or `None` if the found requirement is at
/// least as strict as the expected one.
pub fn compare(found: &str, expected: &str) -> Option<(MismatchReason, Option<String>)> {
    let expected = match Comparison::parse(expected) {
        Ok(c) => c,
        Err(e) => return Some((MismatchReason::InvalidExpectation, Some(e.to_string()))),
    };
    let found = match Comparison::parse(found) {
        Ok(c) => c,
        Err(e) => return Some((MismatchReason::UnsupportedOperatorForType, Some(e.to_string()))),
    };

    match Constraint::from_comparison(&found).implies(&Constraint::from_comparison(&expected)) {
        Some(true) => None,
        Some(false) => Some((MismatchReason::Looser, None)),
        None => Some((
            MismatchReason::KindConflict,
            Some(kind_detail(found.kind(), expected.kind())),
        )),
    }
}

fn kind_detail(found: ValueKind, expected: ValueKind) -> String {
    format!("found {found}, expected {expected}")
}

/// Validate the traits a statement carries against the relying party's
/// expectations.
///
/// Every expected trait must be present and satisfied. Found traits that are
/// not expected are ignored.
pub fn validate(found: &TraitMap, expected: &TraitMap) -> ValidationResult {
    let mut mismatches = Vec::new();
    for (name, expected_raw) in expected {
        let Some(found_raw) = found.get(name) else {
            debug!(name = %name, "expected trait missing");
            mismatches.push(Mismatch::missing(name, expected_raw));
            continue;
        };
        if let Some((reason, detail)) = compare(found_raw, expected_raw) {
            debug!(name = %name, found = %found_raw, expected = %expected_raw, %reason, "trait mismatch");
            mismatches.push(Mismatch {
                trait_name: name.clone(),
                expected: expected_raw.clone(),
                found: Some(found_raw.clone()),
                reason,
                detail,
            });
        }
    }
    ValidationResult::from_mismatches(mismatches)
}
