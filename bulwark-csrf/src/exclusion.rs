//! URL exclusions
//!
//! Requests whose path matches an exclusion pattern skip CSRF enforcement
//! entirely, e.g. webhook or upload endpoints that cannot carry a token:
//!
//! ```text
//! /notify/**
//! /upload/**
//! /admin/roles/:id
//! ```

use crate::trie::PathTrie;

/// Set of URL patterns exempt from CSRF checks.
#[derive(Debug, Clone, Default)]
pub struct ExclusionMatcher {
    trie: PathTrie,
}

impl ExclusionMatcher {
    /// Create an empty matcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exclusion pattern.
    pub fn add_exclusion(&mut self, pattern: &str) {
        self.trie.add_pattern(pattern);
    }

    /// Add an exclusion pattern (builder style).
    pub fn with_exclusion(mut self, pattern: &str) -> Self {
        self.add_exclusion(pattern);
        self
    }

    /// Check whether `url` is excluded. Any query string is ignored.
    pub fn is_excluded(&self, url: &str) -> bool {
        self.trie.matches(strip_query(url))
    }

    /// The pattern that excludes `url`, if any.
    pub fn matching_pattern(&self, url: &str) -> Option<&str> {
        self.trie.find(strip_query(url))
    }

    /// Whether no exclusion is configured.
    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExclusionMatcher {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut matcher = Self::new();
        matcher.extend(iter);
        matcher
    }
}

impl<S: AsRef<str>> Extend<S> for ExclusionMatcher {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for pattern in iter {
            self.add_exclusion(pattern.as_ref());
        }
    }
}

fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}
