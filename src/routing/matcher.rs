//! Callback ID matching logic.
//!
//! # Responsibilities
//! - Match an exact callback ID (case-sensitive)
//! - Match any member of a set of callback IDs
//! - Match a regular expression anywhere in the callback ID
//!
//! # Design Decisions
//! - Constraint is a closed enum, matching is one exhaustive `match`
//! - Patterns are compiled when the constraint is built, so a malformed
//!   pattern is rejected at registration time and never at dispatch
//! - No implicit anchoring: callers write `^...$` when they want it

use std::collections::HashSet;
use std::fmt;

use regex::Regex;
use thiserror::Error;

/// Errors raised while building a constraint.
#[derive(Debug, Error)]
pub enum ConstraintError {
    /// The pattern source is not a valid regular expression.
    #[error("invalid callback_id pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A rule selecting which callback IDs a handler accepts.
#[derive(Clone)]
pub enum Constraint {
    /// Exact, case-sensitive equality.
    Exact(String),
    /// Equality with any member of the set.
    AnyOf(HashSet<String>),
    /// Unanchored regular expression search.
    Pattern(Regex),
}

impl Constraint {
    /// Exact match constraint.
    pub fn exact(callback_id: impl Into<String>) -> Self {
        Self::Exact(callback_id.into())
    }

    /// Set membership constraint.
    pub fn any_of<I, S>(callback_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(callback_ids.into_iter().map(Into::into).collect())
    }

    /// Compile a pattern constraint.
    pub fn pattern(pattern: &str) -> Result<Self, ConstraintError> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|source| ConstraintError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Returns true if `callback_id` satisfies this constraint.
    pub fn matches(&self, callback_id: &str) -> bool {
        match self {
            Constraint::Exact(expected) => expected == callback_id,
            Constraint::AnyOf(set) => set.contains(callback_id),
            Constraint::Pattern(re) => re.is_match(callback_id),
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Exact(s) => f.debug_tuple("Exact").field(s).finish(),
            Constraint::AnyOf(set) => {
                let mut members: Vec<_> = set.iter().collect();
                members.sort();
                f.debug_tuple("AnyOf").field(&members).finish()
            }
            Constraint::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
        }
    }
}

impl From<&str> for Constraint {
    fn from(callback_id: &str) -> Self {
        Self::exact(callback_id)
    }
}

impl From<String> for Constraint {
    fn from(callback_id: String) -> Self {
        Self::Exact(callback_id)
    }
}

impl From<Vec<String>> for Constraint {
    fn from(callback_ids: Vec<String>) -> Self {
        Self::any_of(callback_ids)
    }
}

impl From<Vec<&str>> for Constraint {
    fn from(callback_ids: Vec<&str>) -> Self {
        Self::any_of(callback_ids)
    }
}

impl<const N: usize> From<[&str; N]> for Constraint {
    fn from(callback_ids: [&str; N]) -> Self {
        Self::any_of(callback_ids)
    }
}

impl From<HashSet<String>> for Constraint {
    fn from(callback_ids: HashSet<String>) -> Self {
        Self::AnyOf(callback_ids)
    }
}

impl From<Regex> for Constraint {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}
