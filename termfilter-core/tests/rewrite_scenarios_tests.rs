// termfilter-core/tests/rewrite_scenarios_tests.rs
//! End-to-end behaviour of `RewriteEngine` across strategies, match methods,
//! allow lists and profiles.

use std::sync::Arc;

use termfilter_core::{
    AllowListConfig, FilterConfig, FilterEngine, FilterMethod, FixedSelector, MatchMethod,
    ProfileId, RewriteEngine, TermOptions,
};

fn config_with(method: FilterMethod, terms: Vec<TermOptions>) -> FilterConfig {
    let mut config = FilterConfig { terms, ..FilterConfig::default() };
    config.settings.filter_method = method;
    config
}

fn engine(config: FilterConfig) -> RewriteEngine {
    RewriteEngine::with_selector(config, Arc::new(FixedSelector(0)))
}

#[test_log::test]
fn test_substitute_with_case_and_marker() {
    let mut config = config_with(
        FilterMethod::Substitute,
        vec![TermOptions::new("damn").with_method(MatchMethod::Exact).with_sub("dang")],
    );
    config.settings.preserve_case = true;
    config.settings.substitution_mark = true;

    let out = engine(config).rewrite("Damn, that hurts!", &ProfileId::All, true);
    assert_eq!(out.filtered, "[Dang], that hurts!");
    assert!(out.modified);
    assert_eq!(out.original, "Damn, that hurts!");
}

#[test]
fn test_partial_censor_preserving_first() {
    let mut config = config_with(
        FilterMethod::Censor,
        vec![TermOptions::new("shit").with_method(MatchMethod::Partial)],
    );
    config.settings.preserve_first = true;
    config.settings.preserve_last = false;
    config.settings.censor_character = '*';
    config.settings.censor_fixed_length = 0;

    let out = engine(config).rewrite("that's shitty", &ProfileId::All, true);
    assert_eq!(out.filtered, "that's s***ty");
}

#[test]
fn test_remove_keeps_single_space() {
    let config = config_with(
        FilterMethod::Remove,
        vec![TermOptions::new("hate").with_method(MatchMethod::Exact)],
    );
    let out = engine(config).rewrite("I hate you", &ProfileId::All, true);
    assert_eq!(out.filtered, "I you");
}

#[test]
fn test_allow_listed_enclosing_word_is_untouched() {
    let mut config = config_with(
        FilterMethod::Censor,
        vec![TermOptions::new("ass").with_method(MatchMethod::Partial)],
    );
    config.allow_list = AllowListConfig {
        case_sensitive: vec!["brass".to_string()],
        case_insensitive: Vec::new(),
    };

    let e = engine(config);
    let out = e.rewrite("The brass band played.", &ProfileId::All, true);
    assert_eq!(out.filtered, "The brass band played.");
    assert!(!out.modified);
    assert_eq!(e.occurrence_count(), 0);

    let out = e.rewrite("The brass band played, what an ass.", &ProfileId::All, true);
    assert_eq!(out.filtered, "The brass band played, what an a**.");
}

#[test]
fn test_longer_phrase_consumes_shorter_term() {
    let mut config = config_with(
        FilterMethod::Substitute,
        vec![
            TermOptions::new("hell").with_method(MatchMethod::Exact).with_sub("heck"),
            TermOptions::new("go to hell").with_method(MatchMethod::Exact).with_sub("go elsewhere"),
        ],
    );
    config.settings.substitution_mark = false;

    let out = engine(config).rewrite("go to hell now", &ProfileId::All, true);
    assert_eq!(out.filtered, "go elsewhere now");
    assert_eq!(out.matches.len(), 1);
    assert_eq!(out.matches[0].term_key, "go to hell");
}

#[test]
fn test_shorter_term_never_rematches_censored_phrase() {
    let config = config_with(
        FilterMethod::Censor,
        vec![TermOptions::new("hell"), TermOptions::new("go to hell")],
    );
    let out = engine(config).rewrite("just go to hell, hell yes", &ProfileId::All, true);
    assert_eq!(out.filtered, "just g*********, h*** yes");
    let keys: Vec<&str> = out.matches.iter().map(|m| m.term_key.as_str()).collect();
    assert_eq!(keys, vec!["go to hell", "hell"]);
}

#[test]
fn test_censor_is_idempotent() {
    let config = config_with(
        FilterMethod::Censor,
        vec![
            TermOptions::new("damn"),
            TermOptions::new("shit").with_method(MatchMethod::Partial),
        ],
    );
    let e = engine(config);
    let first = e.rewrite("damn this shitty day", &ProfileId::All, true);
    assert!(first.modified);

    let second = e.rewrite(&first.filtered, &ProfileId::All, true);
    assert!(!second.modified);
    assert_eq!(second.filtered, first.filtered);
}

#[test]
fn test_remove_whitespace_safety() {
    let config = config_with(
        FilterMethod::Remove,
        vec![
            TermOptions::new("damn"),
            TermOptions::new("wtf?"),
            TermOptions::new("бля"),
            TermOptions::new("shit").with_method(MatchMethod::Partial),
        ],
    );
    let e = engine(config);

    for (input, expected) in [
        ("the damn cat", "the cat"),
        ("so wtf? ok", "so ok"),
        ("ну бля опять", "ну опять"),
        ("a shitty plan", "a plan"),
        ("damn it", "it"),
        ("oh damn", "oh"),
    ] {
        assert_eq!(e.rewrite(input, &ProfileId::All, false).filtered, expected, "input: {}", input);
    }
}

#[test]
fn test_remove_keeps_punctuation_for_bounded_terms() {
    let config = config_with(FilterMethod::Remove, vec![TermOptions::new("бля")]);
    let out = engine(config).rewrite("ну бля, опять", &ProfileId::All, false);
    assert_eq!(out.filtered, "ну,опять");
}

#[test]
fn test_case_preservation() {
    let config = config_with(
        FilterMethod::Substitute,
        vec![TermOptions::new("damn").with_sub("dang")],
    );
    let e = engine(config);
    assert_eq!(e.rewrite("DAMN", &ProfileId::All, false).filtered, "DANG");
    assert_eq!(e.rewrite("Damn", &ProfileId::All, false).filtered, "Dang");
    assert_eq!(e.rewrite("damn", &ProfileId::All, false).filtered, "dang");
}

#[test]
fn test_per_term_case_override() {
    let config = config_with(
        FilterMethod::Substitute,
        vec![TermOptions::new("damn").with_sub("dang").with_preserve_case(false)],
    );
    assert_eq!(engine(config).rewrite("DAMN", &ProfileId::All, false).filtered, "dang");
}

#[test]
fn test_dry_run_does_not_touch_counters() {
    let config = config_with(
        FilterMethod::Censor,
        vec![TermOptions::new("ass").with_method(MatchMethod::Partial)],
    );
    let e = engine(config);
    let out = e.rewrite("ass ass ass class", &ProfileId::All, false);
    assert_eq!(out.matches.len(), 4);
    assert_eq!(e.occurrence_count(), 0);

    e.rewrite("ass", &ProfileId::All, true);
    assert_eq!(e.occurrence_count(), 1);
}

#[test]
fn test_unknown_profile_is_a_no_op() {
    let mut config = config_with(FilterMethod::Censor, vec![TermOptions::new("damn")]);
    config.profiles = vec!["kids".to_string()];
    let e = engine(config);

    let out = e.rewrite("damn", &ProfileId::named("nobody"), true);
    assert_eq!(out.filtered, "damn");
    assert!(!out.modified);

    assert_eq!(e.rewrite("damn", &ProfileId::named("kids"), true).filtered, "d***");
}

#[test]
fn test_profile_scoping() {
    let mut config = config_with(
        FilterMethod::Censor,
        vec![
            TermOptions::new("damn"),
            TermOptions::new("stupid").in_profile("kids"),
        ],
    );
    config.profiles = vec!["kids".to_string(), "work".to_string()];
    let e = engine(config);

    assert_eq!(e.rewrite("damn stupid", &ProfileId::named("kids"), false).filtered, "d*** s*****");
    assert_eq!(e.rewrite("damn stupid", &ProfileId::named("work"), false).filtered, "d*** stupid");
    assert_eq!(e.rewrite("damn stupid", &ProfileId::All, false).filtered, "d*** s*****");
}

#[test_log::test]
fn test_broken_regex_term_does_not_block_others() {
    let config = config_with(
        FilterMethod::Censor,
        vec![
            TermOptions::new("(oops").with_method(MatchMethod::Regex),
            TermOptions::new("damn"),
        ],
    );
    let e = engine(config);
    assert_eq!(e.term_set(&ProfileId::All).rejected().len(), 1);
    assert_eq!(e.rewrite("oops damn", &ProfileId::All, true).filtered, "oops d***");
}

#[test]
fn test_repeat_and_separators_catch_obfuscation() {
    let mut config = config_with(
        FilterMethod::Censor,
        vec![TermOptions::new("shit").with_method(MatchMethod::Partial).with_repeat(true).with_separators(true)],
    );
    config.settings.preserve_first = false;
    let e = engine(config);
    assert_eq!(e.rewrite("shiiiit", &ProfileId::All, false).filtered, "*******");
    assert_eq!(e.rewrite("s-h_i t", &ProfileId::All, false).filtered, "*******");
}

#[test]
fn test_repeat_consumes_doubled_trailing_letter() {
    let config = config_with(
        FilterMethod::Censor,
        vec![TermOptions::new("shit").with_method(MatchMethod::Partial).with_repeat(true)],
    );
    let out = engine(config).rewrite("that's shitty", &ProfileId::All, false);
    assert_eq!(out.filtered, "that's s****y");
    assert_eq!(out.matches[0].original, "shitt");
}

#[test]
fn test_whole_censors_entire_word() {
    let mut config = config_with(
        FilterMethod::Censor,
        vec![TermOptions::new("bitch").with_method(MatchMethod::Whole)],
    );
    config.settings.preserve_first = false;
    let out = engine(config).rewrite("stop bitching", &ProfileId::All, false);
    assert_eq!(out.filtered, "stop ********");
}

#[test]
fn test_fixed_length_censor_and_preserve_last() {
    let mut config = config_with(FilterMethod::Censor, vec![TermOptions::new("damn")]);
    config.settings.censor_character = '#';
    config.settings.censor_fixed_length = 3;
    config.settings.preserve_first = true;
    config.settings.preserve_last = true;
    assert_eq!(engine(config).rewrite("damn", &ProfileId::All, false).filtered, "d#n");
}

#[test]
fn test_regex_term_substitution() {
    let config = config_with(
        FilterMethod::Substitute,
        vec![TermOptions::new(r"fr[ie]+ck(ing)?").with_method(MatchMethod::Regex).with_sub("flipping")],
    );
    let out = engine(config).rewrite("Frickin' frecking day", &ProfileId::All, false);
    assert_eq!(out.filtered, "Flippingin' flipping day");
}

#[test]
fn test_concurrent_rewrites_share_one_engine() {
    let config = config_with(FilterMethod::Censor, vec![TermOptions::new("damn")]);
    let e = Arc::new(engine(config));

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let e = Arc::clone(&e);
            scope.spawn(move || {
                for _ in 0..25 {
                    let out = e.rewrite("damn damn", &ProfileId::All, true);
                    assert_eq!(out.filtered, "d*** d***");
                }
            });
        }
    });

    assert_eq!(e.occurrence_count(), 200);
}
