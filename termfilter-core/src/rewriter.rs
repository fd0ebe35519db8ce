//! rewriter.rs - The censor, substitute and remove strategies.
//!
//! Each strategy turns one non-exempted match into its replacement. The active
//! strategy is global: every term's matches go through the same one.
//!
//! License: MIT OR APACHE 2.0

use crate::compiler::term::{MatchParts, Term};
use crate::config::{FilterMethod, FilterSettings};
use crate::selector::SubstitutionSelector;

/// Masks `word` with `censor_char`.
///
/// The mask is `fixed_length` long, or as long as `word` when it is 0.
/// Preserving the first character drops the mask's first slot, preserving the
/// last drops its last slot, and the original characters go around what is
/// left. A one-character word preserved on both sides is returned as is.
pub fn censor_word(
    word: &str,
    censor_char: char,
    fixed_length: usize,
    preserve_first: bool,
    preserve_last: bool,
) -> String {
    let n = if fixed_length > 0 { fixed_length } else { word.chars().count() };
    let mask = |from: usize, to: usize| std::iter::repeat(censor_char).take(to.saturating_sub(from));
    let first = word.chars().next();
    let last = word.chars().last();

    let mut out = String::with_capacity(word.len().max(n));
    match (preserve_first, preserve_last) {
        (true, true) if word.chars().nth(1).is_none() => out.push_str(word),
        (true, true) => {
            out.extend(first);
            out.extend(mask(2, n));
            out.extend(last);
        }
        (true, false) => {
            out.extend(first);
            out.extend(mask(1, n));
        }
        (false, true) => {
            out.extend(mask(0, n.saturating_sub(1)));
            out.extend(last);
        }
        (false, false) => out.extend(mask(0, n)),
    }
    out
}

/// Carries the casing of `source` over to `replacement`: all caps stays all
/// caps, a leading capital stays a leading capital.
pub fn match_case(source: &str, replacement: &str) -> String {
    let has_letters = source.chars().any(char::is_alphabetic);
    if has_letters && !source.chars().any(char::is_lowercase) {
        return replacement.to_uppercase();
    }

    if source.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }

    replacement.to_string()
}

/// Computes what a removed match leaves behind.
///
/// Never leaves doubled whitespace and never glues two words together.
pub fn remove_word(parts: &MatchParts) -> String {
    match parts {
        MatchParts::Bounded { leading, trailing, .. } => {
            if is_whitespace_only(leading) && is_whitespace_only(trailing) {
                leading.to_string()
            } else if has_visible(leading) || has_visible(trailing) {
                format!("{}{}", leading, trailing).trim().to_string()
            } else {
                String::new()
            }
        }
        MatchParts::Plain { raw } => {
            let text = raw.as_str();
            match (text.chars().next(), text.chars().last()) {
                (Some(first), Some(last)) if first.is_whitespace() && last.is_whitespace() => first.to_string(),
                _ => String::new(),
            }
        }
    }
}

fn is_whitespace_only(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_whitespace)
}

fn has_visible(s: &str) -> bool {
    s.chars().any(|c| !c.is_whitespace())
}

/// Applies the configured strategy to matches.
#[derive(Debug, Clone, Copy)]
pub struct Rewriter<'a> {
    settings: &'a FilterSettings,
    selector: &'a dyn SubstitutionSelector,
}

impl<'a> Rewriter<'a> {
    pub fn new(settings: &'a FilterSettings, selector: &'a dyn SubstitutionSelector) -> Self {
        Self { settings, selector }
    }

    /// Returns the text that replaces the whole raw match.
    pub fn rewrite(&self, term: &Term, parts: &MatchParts) -> String {
        match self.settings.filter_method {
            FilterMethod::Off => parts.raw().to_string(),
            FilterMethod::Censor => self.reattach(parts, self.censor(parts.content())),
            FilterMethod::Substitute => self.reattach(parts, self.substitute(term, parts.content())),
            FilterMethod::Remove => remove_word(parts),
        }
    }

    pub fn censor(&self, content: &str) -> String {
        censor_word(
            content,
            self.settings.censor_character,
            self.settings.censor_fixed_length,
            self.settings.preserve_first,
            self.settings.preserve_last,
        )
    }

    pub fn substitute(&self, term: &Term, content: &str) -> String {
        let candidates = term.substitutions();
        let chosen = if candidates.is_empty() {
            self.settings.default_substitution.as_str()
        } else {
            let index = self.selector.select(candidates.len()).min(candidates.len() - 1);
            candidates[index].as_str()
        };

        let cased = if term.preserve_case() {
            match_case(content, chosen)
        } else {
            chosen.to_string()
        };

        if self.settings.substitution_mark {
            format!("[{}]", cased)
        } else {
            cased
        }
    }

    fn reattach(&self, parts: &MatchParts, replacement: String) -> String {
        match parts {
            MatchParts::Plain { .. } => replacement,
            MatchParts::Bounded { leading, trailing, .. } => format!("{}{}{}", leading, replacement, trailing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MatchMethod, TermOptions};
    use crate::selector::FixedSelector;

    #[test]
    fn test_censor_variants() {
        assert_eq!(censor_word("shit", '*', 0, false, false), "****");
        assert_eq!(censor_word("shit", '*', 0, true, false), "s***");
        assert_eq!(censor_word("shit", '*', 0, false, true), "***t");
        assert_eq!(censor_word("shit", '*', 0, true, true), "s**t");
        assert_eq!(censor_word("shit", '#', 6, true, true), "s####t");
        assert_eq!(censor_word("damnit", '-', 3, false, false), "---");
    }

    #[test]
    fn test_censor_short_words() {
        assert_eq!(censor_word("a", '*', 0, true, true), "a");
        assert_eq!(censor_word("a", '*', 0, false, true), "a");
        assert_eq!(censor_word("a", '*', 0, true, false), "a");
        assert_eq!(censor_word("a", '*', 0, false, false), "*");
        assert_eq!(censor_word("ab", '*', 0, true, true), "ab");
    }

    #[test]
    fn test_censor_fixed_length_shorter_than_preserved() {
        assert_eq!(censor_word("shit", '*', 1, true, true), "st");
        assert_eq!(censor_word("shit", '*', 2, true, true), "st");
        assert_eq!(censor_word("shit", '*', 3, true, true), "s*t");
        assert_eq!(censor_word("shit", '*', 1, false, true), "t");
        assert_eq!(censor_word("shit", '*', 1, true, false), "s");
    }

    #[test]
    fn test_match_case() {
        assert_eq!(match_case("DAMN", "dang"), "DANG");
        assert_eq!(match_case("Damn", "dang"), "Dang");
        assert_eq!(match_case("damn", "Dang"), "Dang");
        assert_eq!(match_case("dAMN", "dang"), "dang");
        assert_eq!(match_case("123", "dang"), "dang");
    }

    #[test]
    fn test_substitute_falls_back_to_default_and_marks() {
        let settings = FilterSettings {
            filter_method: FilterMethod::Substitute,
            substitution_mark: true,
            default_substitution: "beep".to_string(),
            ..FilterSettings::default()
        };
        let selector = FixedSelector(0);
        let rewriter = Rewriter::new(&settings, &selector);

        let bare = Term::compile(&TermOptions::new("damn"), &settings).unwrap();
        assert_eq!(rewriter.substitute(&bare, "Damn"), "[Beep]");

        let multi = Term::compile(
            &TermOptions::new("damn").with_sub("dang").with_sub("darn").with_preserve_case(false),
            &settings,
        )
        .unwrap();
        let pick_second = FixedSelector(1);
        let second = Rewriter::new(&settings, &pick_second);
        assert_eq!(second.substitute(&multi, "DAMN"), "[darn]");
    }

    #[test]
    fn test_remove_bounded_fragments() {
        let settings = FilterSettings { filter_method: FilterMethod::Remove, ..FilterSettings::default() };
        let term = Term::compile(&TermOptions::new("бля").with_method(MatchMethod::Exact), &settings).unwrap();

        let cases = [
            ("ну бля опять", " "),
            ("ну бля, опять", ","),
            ("бля опять", ""),
        ];
        for (input, expected) in cases {
            let caps = term.regex().captures(input).unwrap();
            let parts = term.split(&caps).unwrap();
            assert_eq!(remove_word(&parts), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_remove_plain() {
        let settings = FilterSettings { filter_method: FilterMethod::Remove, ..FilterSettings::default() };
        let term = Term::compile(&TermOptions::new("hate"), &settings).unwrap();

        let caps = term.regex().captures("I hate you").unwrap();
        assert_eq!(remove_word(&term.split(&caps).unwrap()), " ");

        let caps = term.regex().captures("hate it").unwrap();
        assert_eq!(remove_word(&term.split(&caps).unwrap()), "");
    }
}
