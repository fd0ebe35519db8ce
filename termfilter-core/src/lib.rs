// termfilter-core/src/lib.rs
//! # termfilter Core Library
//!
//! `termfilter-core` provides the platform-independent logic for filtering
//! configured terms out of text. Every term carries its own matching method,
//! is compiled into a pattern once, and is applied longest first. Each match
//! is censored, substituted, or removed according to a single global
//! strategy, unless an allow list exempts it.
//!
//! The library does no I/O during a rewrite. Loading configuration from YAML
//! is offered as a convenience for hosts.
//!
//! ## Modules
//!
//! * `config`: `FilterConfig`, `FilterSettings`, `TermOptions` and profile ids.
//! * `compiler`: compiles one term into a `Term`, and a profile into a `TermSet`.
//! * `allow_list`: words that are never filtered, including enclosing-token checks.
//! * `rewriter`: the censor, substitute and remove strategies.
//! * `selector`: picks one of several substitution candidates.
//! * `term_match`: match records, per-term summaries and the `MatchObserver` hook.
//! * `engine`: the `FilterEngine` trait and `RewriteOutcome`.
//! * `engines`: the concrete `RewriteEngine`.
//! * `headless`: one-shot convenience wrapper.
//!
//! ## Usage Example
//!
//! ```rust
//! use termfilter_core::{FilterConfig, FilterEngine, FilterMethod, MatchMethod, ProfileId, RewriteEngine, TermOptions};
//!
//! let mut config = FilterConfig::default();
//! config.settings.filter_method = FilterMethod::Censor;
//! config.terms.push(TermOptions::new("shit").with_method(MatchMethod::Partial));
//!
//! let engine = RewriteEngine::new(config);
//! let outcome = engine.rewrite("that's shitty", &ProfileId::All, true);
//!
//! assert_eq!(outcome.filtered, "that's s***ty");
//! assert!(outcome.modified);
//! assert_eq!(engine.occurrence_count(), 1);
//! ```
//!
//! ## Error Handling
//!
//! Typed failures are reported through `FilterError`. A term whose pattern
//! cannot be compiled is logged and left out of its profile; `rewrite` itself
//! never fails.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod allow_list;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod rewriter;
pub mod selector;
pub mod term_match;

/// Re-exports the configuration types and helpers.
pub use config::{
    merge_configs,
    AllowListConfig,
    FilterConfig,
    FilterMethod,
    FilterSettings,
    MatchMethod,
    ProfileId,
    TermOptions,
    MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::FilterError;

pub use compiler::term::{MatchParts, PatternShape, Term, TokenPatterns};
pub use compiler::term_set::TermSet;

pub use allow_list::AllowList;

pub use engine::{FilterEngine, RewriteOutcome};
pub use engines::rewrite_engine::RewriteEngine;

pub use selector::{FixedSelector, RandomSelector, SeededSelector, SubstitutionSelector};

pub use term_match::{MatchObserver, MatchSummaryItem, TermMatch};

pub use headless::headless_rewrite_string;
