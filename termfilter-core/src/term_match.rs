// termfilter-core/src/term_match.rs
//! Data structures for reporting rewritten matches, the observer hook hosts
//! use for statistics, and log helpers that keep matched text out of debug
//! output unless explicitly allowed.

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Whether matched text may appear verbatim in debug logs.
    static ref TEXT_DEBUG_ALLOWED: bool = {
        std::env::var("TERMFILTER_ALLOW_DEBUG_TEXT")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// One non-exempted occurrence rewritten during a pass.
///
/// `start`/`end` are byte offsets into the text as it stood when the
/// producing term's pass ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TermMatch {
    pub term_key: String,
    pub original: String,
    pub replacement: String,
    pub start: usize,
    pub end: usize,
}

/// All matches for one term within a rewrite call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummaryItem {
    pub term_key: String,
    pub occurrences: usize,
    pub original_texts: Vec<String>,
    pub rewritten_texts: Vec<String>,
}

/// Receives every non-exempted match of a recording rewrite, synchronously.
pub trait MatchObserver: Send + Sync {
    fn on_match(&self, term_match: &TermMatch);
}

impl<F> MatchObserver for F
where
    F: Fn(&TermMatch) + Send + Sync,
{
    fn on_match(&self, term_match: &TermMatch) {
        self(term_match)
    }
}

/// Groups matches by term, in order of each term's first match.
pub fn summarize(matches: &[TermMatch]) -> Vec<MatchSummaryItem> {
    let mut summary: Vec<MatchSummaryItem> = Vec::new();
    for m in matches {
        match summary.iter_mut().find(|item| item.term_key == m.term_key) {
            Some(item) => {
                item.occurrences += 1;
                item.original_texts.push(m.original.clone());
                item.rewritten_texts.push(m.replacement.clone());
            }
            None => summary.push(MatchSummaryItem {
                term_key: m.term_key.clone(),
                occurrences: 1,
                original_texts: vec![m.original.clone()],
                rewritten_texts: vec![m.replacement.clone()],
            }),
        }
    }
    summary
}

pub fn mask_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    let len = s.chars().count();
    if len <= MAX_LEN {
        "[MASKED]".to_string()
    } else {
        format!("[MASKED: {} chars]", len)
    }
}

fn get_loggable_content(content: &str) -> String {
    if *TEXT_DEBUG_ALLOWED {
        content.to_string()
    } else {
        mask_sensitive(content)
    }
}

pub fn log_rewrite_debug(term_key: &str, original: &str, replacement: &str) {
    debug!(
        "Rewrite: term='{}', original='{}', replacement='{}'",
        get_loggable_content(term_key),
        get_loggable_content(original),
        replacement
    );
}

pub fn log_exempt_debug(term_key: &str, original: &str) {
    debug!(
        "Allow list kept match for term '{}': '{}'",
        get_loggable_content(term_key),
        get_loggable_content(original)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn m(key: &str, original: &str) -> TermMatch {
        TermMatch {
            term_key: key.to_string(),
            original: original.to_string(),
            replacement: "****".to_string(),
            ..TermMatch::default()
        }
    }

    #[test]
    fn test_mask_sensitive_short_string() {
        assert_eq!(mask_sensitive("abc"), "[MASKED]".to_string());
    }

    #[test]
    fn test_mask_sensitive_long_string() {
        assert_eq!(mask_sensitive("123456789"), "[MASKED: 9 chars]".to_string());
    }

    #[test]
    fn test_summarize_groups_in_first_seen_order() {
        let summary = summarize(&[m("hell", "hell"), m("damn", "Damn"), m("hell", "HELL")]);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].term_key, "hell");
        assert_eq!(summary[0].occurrences, 2);
        assert_eq!(summary[0].original_texts, vec!["hell".to_string(), "HELL".to_string()]);
        assert_eq!(summary[1].term_key, "damn");
    }

    #[test]
    fn test_closure_observer() {
        let seen = AtomicUsize::new(0);
        let observer = |_: &TermMatch| {
            seen.fetch_add(1, Ordering::SeqCst);
        };
        observer.on_match(&m("damn", "damn"));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
