//! OAuth scope sets and the required-scope check
//!
//! Scopes travel as a single space-separated string (the `scope` claim and the
//! `SCOPE` configuration value). Order and duplicates carry no meaning.

use std::collections::BTreeSet;
use std::fmt;

/// A set of scope strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSet {
    scopes: BTreeSet<String>,
}

impl ScopeSet {
    /// Parse a space-separated scope string. Blank input yields an empty set.
    pub fn parse(raw: &str) -> Self {
        raw.split_whitespace().map(String::from).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Check if the set contains a specific scope
    pub fn contains(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }

    /// Check if the set contains every scope of `other`
    pub fn contains_all(&self, other: &ScopeSet) -> bool {
        other.scopes.is_subset(&self.scopes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            scopes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(" "))
    }
}

/// Check granted scopes against the required scopes.
///
/// An empty required set means no restriction is configured and always
/// matches. Otherwise every required scope must be granted.
pub fn matches(granted: &ScopeSet, required: &ScopeSet) -> bool {
    required.is_empty() || granted.contains_all(required)
}
