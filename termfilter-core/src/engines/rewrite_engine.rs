// termfilter-core/src/engines/rewrite_engine.rs
//! A `FilterEngine` implementation that applies each compiled term in turn,
//! longest first, feeding the output of one pass into the next.
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use regex::Captures;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::allow_list::AllowList;
use crate::compiler::term::{Term, TokenPatterns};
use crate::compiler::term_set::TermSet;
use crate::config::{FilterConfig, FilterMethod, ProfileId};
use crate::engine::{FilterEngine, RewriteOutcome};
use crate::rewriter::Rewriter;
use crate::selector::{RandomSelector, SubstitutionSelector};
use crate::term_match::{log_exempt_debug, log_rewrite_debug, MatchObserver, TermMatch};

/// An immutable view of one configuration plus the profiles built from it.
///
/// Replacing the configuration swaps the whole snapshot, so a rewrite that is
/// already running keeps a consistent config, allow list and cache.
#[derive(Debug)]
struct Snapshot {
    config: Arc<FilterConfig>,
    allow_list: AllowList,
    term_sets: RwLock<HashMap<ProfileId, Arc<TermSet>>>,
}

impl Snapshot {
    fn new(config: FilterConfig) -> Self {
        Self {
            allow_list: AllowList::from_config(&config.allow_list),
            config: Arc::new(config),
            term_sets: RwLock::new(HashMap::new()),
        }
    }

    fn resolve_profile(&self, profile: &ProfileId) -> ProfileId {
        if self.config.settings.profiles_enabled {
            profile.clone()
        } else {
            ProfileId::All
        }
    }

    fn build(&self, profile: &ProfileId) -> TermSet {
        match self.config.check_profile(profile) {
            Ok(()) => TermSet::build(&self.config, profile),
            Err(e) => {
                warn!("{}; filtering nothing for it.", e);
                TermSet::empty(profile.clone())
            }
        }
    }

    fn term_set(&self, profile: &ProfileId) -> Arc<TermSet> {
        let profile = self.resolve_profile(profile);
        {
            let cache = self.term_sets.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(set) = cache.get(&profile) {
                return Arc::clone(set);
            }
        }

        let mut cache = self.term_sets.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have built it while we waited for the write lock.
        if let Some(set) = cache.get(&profile) {
            return Arc::clone(set);
        }
        debug!("Term set for profile '{}' not cached. Building now.", profile);
        let set = Arc::new(self.build(&profile));
        cache.insert(profile, Arc::clone(&set));
        set
    }

    fn rebuild(&self, profile: &ProfileId) -> Arc<TermSet> {
        let profile = self.resolve_profile(profile);
        let set = Arc::new(self.build(&profile));
        self.term_sets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(profile, Arc::clone(&set));
        set
    }
}

pub struct RewriteEngine {
    snapshot: RwLock<Arc<Snapshot>>,
    selector: Arc<dyn SubstitutionSelector>,
    observer: Option<Arc<dyn MatchObserver>>,
    occurrences: AtomicU64,
}

impl fmt::Debug for RewriteEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewriteEngine")
            .field("snapshot", &self.snapshot)
            .field("selector", &self.selector)
            .field("observer", &self.observer.is_some())
            .field("occurrences", &self.occurrences)
            .finish()
    }
}

/// Per-pass state shared with the replacement closure.
struct Pass<'a> {
    key: &'a str,
    term: &'a Term,
    haystack: &'a str,
    allow_list: &'a AllowList,
    rewriter: Rewriter<'a>,
}

impl RewriteEngine {
    pub fn new(config: FilterConfig) -> Self {
        Self::with_selector(config, Arc::new(RandomSelector))
    }

    pub fn with_selector(config: FilterConfig, selector: Arc<dyn SubstitutionSelector>) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::new(config))),
            selector,
            observer: None,
            occurrences: AtomicU64::new(0),
        }
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Computes the replacement for one regex match within a pass.
    fn resolve(
        &self,
        pass: &Pass,
        caps: &Captures,
        record_stats: bool,
        tokens: &mut TokenPatterns,
        matches: &mut Vec<TermMatch>,
    ) -> String {
        let raw = caps.get(0).map_or("", |m| m.as_str());
        let Some(parts) = pass.term.split(caps) else {
            return raw.to_string();
        };

        // Zero-width matches from user regexes carry nothing to rewrite.
        if parts.content().is_empty() {
            return raw.to_string();
        }

        if pass.allow_list.exempts(pass.term, &parts, pass.haystack, tokens) {
            log_exempt_debug(pass.key, parts.content());
            return raw.to_string();
        }

        let replacement = pass.rewriter.rewrite(pass.term, &parts);
        log_rewrite_debug(pass.key, raw, &replacement);

        let start = caps.get(0).map_or(0, |m| m.start());
        let term_match = TermMatch {
            term_key: pass.key.to_string(),
            original: parts.content().to_string(),
            replacement: replacement.clone(),
            start,
            end: start + raw.len(),
        };

        if record_stats {
            self.occurrences.fetch_add(1, Ordering::Relaxed);
            if let Some(observer) = &self.observer {
                observer.on_match(&term_match);
            }
        }
        matches.push(term_match);

        replacement
    }
}

impl FilterEngine for RewriteEngine {
    fn rewrite(&self, text: &str, profile: &ProfileId, record_stats: bool) -> RewriteOutcome {
        let snapshot = self.snapshot();
        let settings = &snapshot.config.settings;
        if settings.filter_method == FilterMethod::Off || text.is_empty() {
            return RewriteOutcome::unchanged(text);
        }

        let term_set = snapshot.term_set(profile);
        let rewriter = Rewriter::new(settings, self.selector.as_ref());
        let mut filtered = text.to_string();
        let mut matches = Vec::new();
        let mut tokens = TokenPatterns::new();

        for (key, term) in term_set.iter() {
            let next = {
                let pass = Pass {
                    key,
                    term,
                    haystack: &filtered,
                    allow_list: &snapshot.allow_list,
                    rewriter,
                };
                term.regex().replace_all(&filtered, |caps: &Captures| {
                    self.resolve(&pass, caps, record_stats, &mut tokens, &mut matches)
                })
            };
            if let Cow::Owned(rewritten) = next {
                filtered = rewritten;
            }
        }

        debug!(
            "Rewrite against profile '{}' finished with {} matches.",
            term_set.profile(),
            matches.len()
        );

        RewriteOutcome {
            modified: filtered != text,
            original: text.to_string(),
            filtered,
            matches,
        }
    }

    fn term_set(&self, profile: &ProfileId) -> Arc<TermSet> {
        self.snapshot().term_set(profile)
    }

    fn rebuild_profile(&self, profile: &ProfileId) -> Arc<TermSet> {
        debug!("Rebuilding term set for profile '{}'.", profile);
        self.snapshot().rebuild(profile)
    }

    fn replace_config(&self, config: FilterConfig) {
        debug!("Replacing configuration; all cached profiles are discarded.");
        let fresh = Arc::new(Snapshot::new(config));
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = fresh;
    }

    fn config(&self) -> Arc<FilterConfig> {
        Arc::clone(&self.snapshot().config)
    }

    fn occurrence_count(&self) -> u64 {
        self.occurrences.load(Ordering::Relaxed)
    }

    fn reset_occurrence_count(&self) {
        self.occurrences.store(0, Ordering::Relaxed);
    }

    fn set_match_observer(&mut self, observer: Arc<dyn MatchObserver>) {
        self.observer = Some(observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MatchMethod, TermOptions};
    use crate::selector::FixedSelector;
    use std::sync::Mutex;

    fn engine(method: FilterMethod, terms: Vec<TermOptions>) -> RewriteEngine {
        let mut config = FilterConfig { terms, ..FilterConfig::default() };
        config.settings.filter_method = method;
        RewriteEngine::with_selector(config, Arc::new(FixedSelector(0)))
    }

    #[test]
    fn test_off_returns_text_unchanged() {
        let e = engine(FilterMethod::Off, vec![TermOptions::new("damn")]);
        let out = e.rewrite("damn it", &ProfileId::All, true);
        assert_eq!(out.filtered, "damn it");
        assert!(!out.modified);
        assert_eq!(e.occurrence_count(), 0);
    }

    #[test]
    fn test_term_set_is_cached_until_rebuilt() {
        let e = engine(FilterMethod::Censor, vec![TermOptions::new("damn")]);
        let first = e.term_set(&ProfileId::All);
        let second = e.term_set(&ProfileId::All);
        assert!(Arc::ptr_eq(&first, &second));

        let rebuilt = e.rebuild_profile(&ProfileId::All);
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        assert!(Arc::ptr_eq(&rebuilt, &e.term_set(&ProfileId::All)));
    }

    #[test]
    fn test_replace_config_invalidates_profiles() {
        let e = engine(FilterMethod::Censor, vec![TermOptions::new("damn")]);
        assert_eq!(e.rewrite("damn heck", &ProfileId::All, false).filtered, "d*** heck");

        let mut next = FilterConfig {
            terms: vec![TermOptions::new("heck")],
            ..FilterConfig::default()
        };
        next.settings.preserve_first = false;
        e.replace_config(next);
        assert_eq!(e.rewrite("damn heck", &ProfileId::All, false).filtered, "damn ****");
    }

    #[test]
    fn test_observer_sees_each_recorded_match_once() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut e = engine(
            FilterMethod::Censor,
            vec![TermOptions::new("ass").with_method(MatchMethod::Partial)],
        );
        e.set_match_observer(Arc::new(move |m: &TermMatch| {
            sink.lock().unwrap().push(m.term_key.clone());
        }));

        e.rewrite("ass, bass, class", &ProfileId::All, false);
        assert!(seen.lock().unwrap().is_empty());

        e.rewrite("ass, bass, class", &ProfileId::All, true);
        assert_eq!(seen.lock().unwrap().len(), 3);
        assert_eq!(e.occurrence_count(), 3);

        e.reset_occurrence_count();
        assert_eq!(e.occurrence_count(), 0);
    }

    #[test]
    fn test_profiles_disabled_resolves_to_all() {
        let mut config = FilterConfig {
            profiles: vec!["kids".to_string()],
            terms: vec![TermOptions::new("heck").in_profile("kids")],
            ..FilterConfig::default()
        };
        config.settings.profiles_enabled = false;
        let e = RewriteEngine::new(config);
        let set = e.term_set(&ProfileId::named("unknown"));
        assert_eq!(set.profile(), &ProfileId::All);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_zero_width_regex_matches_are_ignored() {
        let e = engine(
            FilterMethod::Substitute,
            vec![TermOptions::new("x*").with_method(MatchMethod::Regex)],
        );
        let out = e.rewrite("abc", &ProfileId::All, true);
        assert_eq!(out.filtered, "abc");
        assert!(out.matches.is_empty());
    }

    #[test]
    fn test_allow_list_checks_each_enclosing_token() {
        let mut config = FilterConfig {
            terms: vec![TermOptions::new("ass").with_method(MatchMethod::Partial)],
            ..FilterConfig::default()
        };
        config.allow_list.case_insensitive = vec!["brass".to_string(), "class".to_string()];
        let e = RewriteEngine::with_selector(config, Arc::new(FixedSelector(0)));

        let out = e.rewrite("brass bass Class ass", &ProfileId::All, true);
        assert_eq!(out.filtered, "brass ba** Class a**");
        assert_eq!(out.matches.len(), 2);
        assert_eq!(e.occurrence_count(), 2);
    }

    #[test]
    fn test_preserve_last_keeps_single_character_match() {
        let mut config = FilterConfig {
            terms: vec![TermOptions::new("x")],
            ..FilterConfig::default()
        };
        config.settings.preserve_first = false;
        config.settings.preserve_last = true;
        let e = RewriteEngine::with_selector(config, Arc::new(FixedSelector(0)));

        assert_eq!(e.rewrite("x marks", &ProfileId::All, false).filtered, "x marks");
        assert_eq!(e.rewrite("xyz x", &ProfileId::All, false).filtered, "xyz x");
    }
}
