//! term.rs - Compiles one configured term into a ready-to-use pattern.
//!
//! A `Term` owns its compiled `Regex` together with the `PatternShape` that
//! tells the rewrite strategies how to read a match. The shape is decided once
//! at construction:
//!
//! * `Plain`: the whole match is the content. Used for `regex` terms and for
//!   terms where `\b` anchors correctly.
//! * `Bounded`: `\b` is unreliable (characters above U+00FF, or punctuation at
//!   either edge of the term), so the pattern captures an explicit leading
//!   boundary, the content, and a trailing boundary as groups 1, 2 and 3.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::{Captures, Match, Regex, RegexBuilder};
use std::collections::HashMap;
use std::ops::Range;

use crate::config::{FilterMethod, FilterSettings, MatchMethod, TermOptions, MAX_PATTERN_LENGTH};
use crate::errors::FilterError;

/// Characters that may surround a term when `\b` cannot be trusted.
const BOUNDARY_CLASS: &str = r#"[\s.,'"+!?|\-]"#;
/// Anything that is not a boundary character, i.e. part of the same token.
const TOKEN_CLASS: &str = r#"[^\s.,'"+!?|\-]"#;
/// Injected between literal characters when separators are allowed.
const SEPARATOR_FRAGMENT: &str = r"[ _\-]*";
const COMPILED_SIZE_LIMIT: usize = 10 * (1 << 20);

/// How the groups of a term's pattern map onto boundary and content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternShape {
    Plain,
    Bounded,
}

/// A single match split according to the producing term's `PatternShape`.
#[derive(Debug, Clone, Copy)]
pub enum MatchParts<'h> {
    Plain {
        raw: Match<'h>,
    },
    Bounded {
        raw: Match<'h>,
        leading: &'h str,
        content: Match<'h>,
        trailing: &'h str,
    },
}

impl<'h> MatchParts<'h> {
    /// The complete text consumed by the pattern.
    pub fn raw(&self) -> &'h str {
        match self {
            MatchParts::Plain { raw } | MatchParts::Bounded { raw, .. } => raw.as_str(),
        }
    }

    /// The text the strategies rewrite.
    pub fn content(&self) -> &'h str {
        match self {
            MatchParts::Plain { raw } => raw.as_str(),
            MatchParts::Bounded { content, .. } => content.as_str(),
        }
    }

    /// The content without padding whitespace, with its byte range in the haystack.
    ///
    /// `Plain` remove patterns swallow one adjoining space on each side; this
    /// strips it so allow-list lookups see the bare word.
    pub fn word(&self) -> (&'h str, Range<usize>) {
        let m = match self {
            MatchParts::Plain { raw } => raw,
            MatchParts::Bounded { content, .. } => content,
        };
        let text = m.as_str();
        let leading_ws = text.len() - text.trim_start().len();
        let word = text.trim();
        let start = m.start() + leading_ws;
        (word, start..start + word.len())
    }
}

/// Inputs shared by every per-method pattern builder.
struct PatternSource<'a> {
    /// Escaped literal with repetition and separator fragments applied.
    phrase: &'a str,
    bounded: bool,
    remove: bool,
}

type PatternBuilder = fn(&PatternSource) -> String;

fn builder_for(method: MatchMethod) -> PatternBuilder {
    match method {
        MatchMethod::Exact => build_exact,
        MatchMethod::Partial => build_partial,
        MatchMethod::Whole => build_whole,
        MatchMethod::Regex => build_regex,
    }
}

fn bounded_token(phrase: &str) -> String {
    format!(
        "(^|{b}+)({t}*{p}{t}*)({b}+|$)",
        b = BOUNDARY_CLASS,
        t = TOKEN_CLASS,
        p = phrase
    )
}

fn build_exact(src: &PatternSource) -> String {
    if src.bounded {
        format!("(^|{b}+)({p})({b}+|$)", b = BOUNDARY_CLASS, p = src.phrase)
    } else if src.remove {
        format!(r"\s?\b{}\b\s?", src.phrase)
    } else {
        format!(r"\b{}\b", src.phrase)
    }
}

fn build_partial(src: &PatternSource) -> String {
    match (src.bounded, src.remove) {
        (true, true) => bounded_token(src.phrase),
        (true, false) => format!("()({})()", src.phrase),
        (false, true) => format!(r"\s?\b[\w-]*{}[\w-]*\b\s?", src.phrase),
        (false, false) => src.phrase.to_string(),
    }
}

fn build_whole(src: &PatternSource) -> String {
    if src.bounded {
        bounded_token(src.phrase)
    } else {
        format!(r"\b[\w-]*{}[\w-]*\b", src.phrase)
    }
}

fn build_regex(src: &PatternSource) -> String {
    src.phrase.to_string()
}

/// Escapes each literal character, optionally allowing repetition of every
/// character and separators between them.
fn process_phrase(text: &str, repeated: bool, separators: bool) -> String {
    let mut out = String::with_capacity(text.len() * 4);
    let mut chars = text.chars().peekable();
    let mut buf = [0u8; 4];
    while let Some(c) = chars.next() {
        out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        if repeated {
            out.push('+');
        }
        if separators && chars.peek().is_some() {
            out.push_str(SEPARATOR_FRAGMENT);
        }
    }
    out
}

fn contains_non_latin(text: &str) -> bool {
    text.chars().any(|c| u32::from(c) > 0xFF)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn has_edge_punctuation(text: &str) -> bool {
    let first = text.chars().next().map_or(false, |c| !is_word_char(c));
    let last = text.chars().last().map_or(false, |c| !is_word_char(c));
    first || last
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(COMPILED_SIZE_LIMIT)
        .build()
}

/// One configured term compiled against the current settings.
#[derive(Debug, Clone)]
pub struct Term {
    text: String,
    match_method: MatchMethod,
    match_repeated: bool,
    match_separators: bool,
    substitutions: Vec<String>,
    preserve_case: bool,
    contains_non_latin: bool,
    shape: PatternShape,
    regex: Regex,
}

impl Term {
    /// Compiles a term. Fields omitted from `options` fall back to the
    /// defaults in `settings`; the active filter method decides whether the
    /// remove-specific pattern variants are used.
    pub fn compile(options: &TermOptions, settings: &FilterSettings) -> Result<Self, FilterError> {
        if options.text.is_empty() {
            return Err(FilterError::EmptyTerm);
        }

        let match_method = options.match_method.unwrap_or(settings.default_match_method);
        let regex_mode = match_method == MatchMethod::Regex;
        // Repetition and separators never apply to user-supplied patterns.
        let match_repeated = !regex_mode && options.repeat.unwrap_or(settings.default_repeat);
        let match_separators = !regex_mode && options.separators.unwrap_or(settings.default_separators);

        if regex_mode && options.text.len() > MAX_PATTERN_LENGTH {
            return Err(FilterError::PatternLengthExceeded(
                options.text.clone(),
                options.text.len(),
                MAX_PATTERN_LENGTH,
            ));
        }

        let non_latin = contains_non_latin(&options.text);
        let bounded = !regex_mode && (non_latin || has_edge_punctuation(&options.text));
        let phrase = if regex_mode {
            options.text.clone()
        } else {
            process_phrase(&options.text, match_repeated, match_separators)
        };

        let pattern = builder_for(match_method)(&PatternSource {
            phrase: &phrase,
            bounded,
            remove: settings.filter_method == FilterMethod::Remove,
        });

        debug!("Compiling term '{}' ({:?}) as pattern '{}'", options.text, match_method, pattern);
        let regex = compile(&pattern)
            .map_err(|e| FilterError::TermCompilation(options.text.clone(), e))?;

        Ok(Self {
            text: options.text.clone(),
            match_method,
            match_repeated,
            match_separators,
            substitutions: options.sub.clone(),
            preserve_case: options.preserve_case.unwrap_or(settings.preserve_case),
            contains_non_latin: non_latin,
            shape: if bounded { PatternShape::Bounded } else { PatternShape::Plain },
            regex,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn match_method(&self) -> MatchMethod {
        self.match_method
    }

    pub fn match_repeated(&self) -> bool {
        self.match_repeated
    }

    pub fn match_separators(&self) -> bool {
        self.match_separators
    }

    pub fn substitutions(&self) -> &[String] {
        &self.substitutions
    }

    pub fn preserve_case(&self) -> bool {
        self.preserve_case
    }

    pub fn contains_non_latin(&self) -> bool {
        self.contains_non_latin
    }

    pub fn shape(&self) -> PatternShape {
        self.shape
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Splits a set of captures produced by this term's regex.
    pub fn split<'h>(&self, caps: &Captures<'h>) -> Option<MatchParts<'h>> {
        let raw = caps.get(0)?;
        match self.shape {
            PatternShape::Plain => Some(MatchParts::Plain { raw }),
            PatternShape::Bounded => Some(MatchParts::Bounded {
                raw,
                leading: caps.get(1).map_or("", |m| m.as_str()),
                content: caps.get(2)?,
                trailing: caps.get(3).map_or("", |m| m.as_str()),
            }),
        }
    }
}

/// Whole-token patterns synthesized from matched words, built once per
/// distinct word (case-folded) and reused for the rest of a rewrite call.
#[derive(Debug, Default)]
pub struct TokenPatterns {
    cache: HashMap<String, Option<(Regex, bool)>>,
}

impl TokenPatterns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct words a pattern was attempted for.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Finds the complete token in `haystack` that encloses `range`.
    pub fn enclosing_token<'h>(&mut self, word: &str, range: Range<usize>, haystack: &'h str) -> Option<&'h str> {
        if word.is_empty() {
            return None;
        }
        let (regex, bounded) = self
            .cache
            .entry(word.to_lowercase())
            .or_insert_with(|| token_pattern(word))
            .as_ref()?;

        let group = if *bounded { 2 } else { 0 };
        let token = regex
            .captures_iter(haystack)
            .filter_map(|caps| caps.get(group))
            .take_while(|token| token.start() <= range.start)
            .find(|token| token.end() >= range.end)
            .map(|token| token.as_str());
        token
    }
}

fn token_pattern(word: &str) -> Option<(Regex, bool)> {
    let bounded = contains_non_latin(word) || has_edge_punctuation(word);
    let pattern = build_whole(&PatternSource {
        phrase: &process_phrase(word, false, false),
        bounded,
        remove: false,
    });
    match compile(&pattern) {
        Ok(regex) => Some((regex, bounded)),
        Err(e) => {
            debug!("Could not build enclosing-token pattern: {}", e);
            None
        }
    }
}
