//! Validation strategies, one per unit variant.
//!
//! Pure functions: the state machine in [`crate::unit`] selects the right
//! strategy by pattern match on the unit kind and owns all bookkeeping.

use crate::model::OptionKey;

/// Collapse every whitespace run to a single space and trim the ends.
///
/// Idempotent: normalizing a normalized string is a no-op.
#[must_use]
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Outcome of evaluating a token arrangement against a canonical headline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrangementOutcome {
    pub is_correct: bool,
    pub normalized_user: String,
    pub normalized_canonical: String,
}

/// Quiz strategy: exact option-code equality.
#[must_use]
pub fn check_option(selected: OptionKey, correct: OptionKey) -> bool {
    selected == correct
}

/// Scramble strategy: join the user's tokens with single spaces, normalize
/// whitespace on both sides, and compare for exact equality.
#[must_use]
pub fn check_arrangement<S: AsRef<str>>(user_tokens: &[S], canonical: &str) -> ArrangementOutcome {
    let joined = user_tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    let normalized_user = normalize_whitespace(&joined);
    let normalized_canonical = normalize_whitespace(canonical);
    ArrangementOutcome {
        is_correct: normalized_user == normalized_canonical,
        normalized_user,
        normalized_canonical,
    }
}
