//! allow_list.rs - Words that stay untouched even when a term matches them.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use std::collections::HashSet;

use crate::compiler::term::{MatchParts, Term, TokenPatterns};
use crate::config::{AllowListConfig, MatchMethod};

#[derive(Debug, Clone, Default)]
pub struct AllowList {
    case_sensitive: HashSet<String>,
    /// Stored lowercased.
    case_insensitive: HashSet<String>,
}

impl AllowList {
    pub fn from_config(config: &AllowListConfig) -> Self {
        Self {
            case_sensitive: config.case_sensitive.iter().cloned().collect(),
            case_insensitive: config.case_insensitive.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.case_sensitive.is_empty() && self.case_insensitive.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.case_sensitive.contains(word) || self.case_insensitive.contains(&word.to_lowercase())
    }

    /// Decides whether a match must be left as is.
    ///
    /// For `partial` terms the complete token around the match in `haystack`
    /// is checked too, so allowing "brass" shields it from the term "ass".
    /// `tokens` caches the whole-token patterns that check needs.
    pub fn exempts(&self, term: &Term, parts: &MatchParts, haystack: &str, tokens: &mut TokenPatterns) -> bool {
        if self.is_empty() {
            return false;
        }

        let (word, range) = parts.word();
        if self.contains(word) {
            return true;
        }

        if term.match_method() == MatchMethod::Partial {
            if let Some(token) = tokens.enclosing_token(word, range, haystack) {
                if token != word && self.contains(token) {
                    debug!("Match inside allowed token for term '{}'", term.text());
                    return true;
                }
            }
        }

        false
    }
}
