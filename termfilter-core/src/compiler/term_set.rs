//! term_set.rs - The ordered, profile-scoped collection of compiled terms.
//!
//! A `TermSet` is built from scratch for one `ProfileId` and never mutated
//! afterwards. Terms are ordered longest first so that a phrase like
//! "go to hell" is rewritten before "hell" gets its own pass.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};

use crate::compiler::term::Term;
use crate::config::{FilterConfig, ProfileId};
use crate::errors::FilterError;

#[derive(Debug)]
pub struct TermSet {
    profile: ProfileId,
    terms: Vec<Term>,
    /// Configuration keys, parallel to `terms`.
    keys: Vec<String>,
    /// Terms that failed to compile, kept so hosts can surface a warning.
    rejected: Vec<FilterError>,
}

impl TermSet {
    /// Builds the term set for `profile`. A term that fails to compile is
    /// logged and excluded; it never prevents the rest from loading.
    pub fn build(config: &FilterConfig, profile: &ProfileId) -> Self {
        debug!(
            "Building term set for profile '{}' from {} configured terms.",
            profile,
            config.terms.len()
        );

        let mut candidates: Vec<_> = config.terms.iter()
            .filter(|options| options.belongs_to(profile))
            .collect();
        // Stable sort: equal lengths keep configuration order.
        candidates.sort_by(|a, b| b.text.chars().count().cmp(&a.text.chars().count()));

        let mut terms = Vec::with_capacity(candidates.len());
        let mut keys = Vec::with_capacity(candidates.len());
        let mut rejected = Vec::new();

        for options in candidates {
            match Term::compile(options, &config.settings) {
                Ok(term) => {
                    keys.push(options.text.clone());
                    terms.push(term);
                }
                Err(e) => {
                    warn!("Skipping term '{}' in profile '{}': {}", options.text, profile, e);
                    rejected.push(e);
                }
            }
        }

        debug!(
            "Finished building profile '{}'. Compiled: {}, rejected: {}.",
            profile,
            terms.len(),
            rejected.len()
        );

        Self { profile: profile.clone(), terms, keys, rejected }
    }

    /// A set with no terms; rewriting against it is a no-op.
    pub fn empty(profile: ProfileId) -> Self {
        Self { profile, terms: Vec::new(), keys: Vec::new(), rejected: Vec::new() }
    }

    pub fn profile(&self) -> &ProfileId {
        &self.profile
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn rejected(&self) -> &[FilterError] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Term> {
        self.terms.get(index)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    pub fn get_by_key(&self, key: &str) -> Option<&Term> {
        self.position(key).and_then(|i| self.terms.get(i))
    }

    /// Iterates `(key, term)` pairs in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.keys.iter().map(String::as_str).zip(self.terms.iter())
    }
}
