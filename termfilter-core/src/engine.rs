// termfilter-core/src/engine.rs
//! Defines the core FilterEngine trait and the result type of a rewrite.
//!
//! The `FilterEngine` trait is the contract a host programs against. It keeps
//! the host decoupled from how terms are compiled, cached and applied.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::compiler::term_set::TermSet;
use crate::config::{FilterConfig, ProfileId};
use crate::term_match::{summarize, MatchObserver, MatchSummaryItem, TermMatch};

/// The result of one `rewrite` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteOutcome {
    pub original: String,
    pub filtered: String,
    pub modified: bool,
    /// Every non-exempted match, in the order the passes produced them.
    pub matches: Vec<TermMatch>,
}

impl RewriteOutcome {
    pub fn unchanged(text: &str) -> Self {
        Self {
            original: text.to_string(),
            filtered: text.to_string(),
            modified: false,
            matches: Vec::new(),
        }
    }

    pub fn summary(&self) -> Vec<MatchSummaryItem> {
        summarize(&self.matches)
    }
}

/// A trait that defines the functionality of a term-filtering engine.
pub trait FilterEngine: Send + Sync {
    /// Rewrites `text` using the terms of `profile`.
    ///
    /// Never fails: terms that could not be compiled were already excluded
    /// when the profile was built. When `record_stats` is false the call is a
    /// dry classification pass and leaves the occurrence counter and the
    /// observer untouched.
    fn rewrite(&self, text: &str, profile: &ProfileId, record_stats: bool) -> RewriteOutcome;

    /// Returns the term set for `profile`, building and caching it if needed.
    fn term_set(&self, profile: &ProfileId) -> Arc<TermSet>;

    /// Discards any cached term set for `profile` and builds a fresh one.
    fn rebuild_profile(&self, profile: &ProfileId) -> Arc<TermSet>;

    /// Swaps in a new configuration, invalidating every cached profile.
    fn replace_config(&self, config: FilterConfig);

    /// Returns the configuration currently in effect.
    fn config(&self) -> Arc<FilterConfig>;

    /// Number of matches rewritten by recording calls since the last reset.
    fn occurrence_count(&self) -> u64;

    fn reset_occurrence_count(&self);

    /// Registers the hook notified once per match of a recording rewrite.
    fn set_match_observer(&mut self, observer: Arc<dyn MatchObserver>);
}
