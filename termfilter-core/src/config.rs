//! Configuration management for `termfilter-core`.
//!
//! This module defines the data structures the engine consumes: global filter
//! settings, the ordered list of configured terms, declared profiles, and the
//! allow lists. It handles YAML (de)serialization and provides utilities for
//! loading, merging, and validating configurations.
//!
//! The engine treats a `FilterConfig` as read-only. Persisting or syncing it is
//! the host's concern.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::FilterError;

/// Maximum allowed length for a user-supplied `regex` term.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// How a term's text is located inside the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    /// The term bounded by word edges.
    #[default]
    Exact,
    /// The term anywhere, including inside larger words.
    Partial,
    /// The whole word that contains the term.
    Whole,
    /// The term text is a regular expression used verbatim.
    Regex,
}

/// The single, global rewrite strategy applied to every match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMethod {
    Off,
    #[default]
    Censor,
    Substitute,
    Remove,
}

impl FromStr for FilterMethod {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(FilterMethod::Off),
            "censor" => Ok(FilterMethod::Censor),
            "substitute" => Ok(FilterMethod::Substitute),
            "remove" => Ok(FilterMethod::Remove),
            other => Err(FilterError::InvalidConfig(format!("unknown filter method '{}'", other))),
        }
    }
}

/// Selects which configured terms take part in a rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileId {
    /// Every configured term, regardless of membership.
    All,
    Named(String),
}

impl ProfileId {
    pub fn named(name: impl Into<String>) -> Self {
        ProfileId::Named(name.into())
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        ProfileId::All
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProfileId::All => write!(f, "all"),
            ProfileId::Named(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for ProfileId {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(FilterError::InvalidConfig("profile name cannot be empty".to_string()));
        }
        if trimmed == "*" || trimmed.eq_ignore_ascii_case("all") {
            Ok(ProfileId::All)
        } else {
            Ok(ProfileId::Named(trimmed.to_string()))
        }
    }
}

/// Global settings read by the engine on every rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterSettings {
    pub filter_method: FilterMethod,
    pub censor_character: char,
    /// Length of the censor mask; 0 uses the length of the matched text.
    pub censor_fixed_length: usize,
    pub preserve_first: bool,
    pub preserve_last: bool,
    pub preserve_case: bool,
    /// Wrap substitutions in `[` `]`.
    pub substitution_mark: bool,
    pub default_substitution: String,
    pub default_match_method: MatchMethod,
    pub default_repeat: bool,
    pub default_separators: bool,
    /// When false, every profile request resolves to all terms.
    pub profiles_enabled: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            filter_method: FilterMethod::Censor,
            censor_character: '*',
            censor_fixed_length: 0,
            preserve_first: true,
            preserve_last: false,
            preserve_case: true,
            substitution_mark: false,
            default_substitution: "censored".to_string(),
            default_match_method: MatchMethod::Exact,
            default_repeat: false,
            default_separators: false,
            profiles_enabled: true,
        }
    }
}

/// Options for a single configured term. The `text` doubles as its key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TermOptions {
    pub text: String,
    pub match_method: Option<MatchMethod>,
    pub repeat: Option<bool>,
    pub separators: Option<bool>,
    /// Candidate substitutions. Accepts a single string or a list.
    #[serde(deserialize_with = "one_or_many")]
    pub sub: Vec<String>,
    /// Overrides `FilterSettings::preserve_case` for this term.
    pub preserve_case: Option<bool>,
    /// Profiles this term belongs to; empty means every profile.
    pub profiles: Vec<String>,
}

impl TermOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn with_method(mut self, method: MatchMethod) -> Self {
        self.match_method = Some(method);
        self
    }

    pub fn with_sub(mut self, sub: impl Into<String>) -> Self {
        self.sub.push(sub.into());
        self
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn with_separators(mut self, separators: bool) -> Self {
        self.separators = Some(separators);
        self
    }

    pub fn with_preserve_case(mut self, preserve_case: bool) -> Self {
        self.preserve_case = Some(preserve_case);
        self
    }

    pub fn in_profile(mut self, profile: impl Into<String>) -> Self {
        self.profiles.push(profile.into());
        self
    }

    /// Whether this term takes part in the given profile.
    pub fn belongs_to(&self, profile: &ProfileId) -> bool {
        match profile {
            ProfileId::All => true,
            ProfileId::Named(name) => self.profiles.is_empty() || self.profiles.iter().any(|p| p == name),
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let values = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    };
    Ok(values.into_iter().filter(|v| !v.is_empty()).collect())
}

/// Words exempted from filtering even when a term matches them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AllowListConfig {
    pub case_sensitive: Vec<String>,
    pub case_insensitive: Vec<String>,
}

/// Represents the top-level configuration structure for termfilter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub settings: FilterSettings,
    /// Declared profile names. Requests for other names filter nothing.
    pub profiles: Vec<String>,
    /// Ordered term list; file order breaks length ties.
    pub terms: Vec<TermOptions>,
    pub allow_list: AllowListConfig,
}

impl FilterConfig {
    /// Loads a filter configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading filter configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .map_err(FilterError::from)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: FilterConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        info!("Loaded {} terms from file {}.", config.terms.len(), path.display());

        Ok(config)
    }

    /// Loads the built-in configuration embedded in the library.
    pub fn load_default_config() -> Result<Self> {
        debug!("Loading default filter configuration from embedded string...");
        let default_yaml = include_str!("../config/default_filter.yaml");
        let config: FilterConfig = serde_yml::from_str(default_yaml)
            .context("Failed to parse default filter configuration")?;

        debug!("Loaded {} default terms.", config.terms.len());
        Ok(config)
    }

    /// Checks that a profile can be resolved against this configuration.
    pub fn check_profile(&self, profile: &ProfileId) -> Result<(), FilterError> {
        match profile {
            ProfileId::All => Ok(()),
            ProfileId::Named(name) if self.profiles.iter().any(|p| p == name) => Ok(()),
            ProfileId::Named(name) => Err(FilterError::UnknownProfile(name.clone())),
        }
    }

    pub fn term(&self, key: &str) -> Option<&TermOptions> {
        self.terms.iter().find(|t| t.text == key)
    }

    /// Validates structural integrity of the term list.
    ///
    /// Invalid `regex` syntax is deliberately not checked here; a broken regex
    /// term is excluded when its profile is built instead of failing the load.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut errors = Vec::new();
        let declared: HashSet<&str> = self.profiles.iter().map(String::as_str).collect();

        for term in &self.terms {
            if term.text.is_empty() {
                errors.push(FilterError::EmptyTerm.to_string());
                continue;
            }
            if !seen.insert(term.text.as_str()) {
                errors.push(format!("Duplicate term found: '{}'.", term.text));
            }
            for profile in &term.profiles {
                if !declared.contains(profile.as_str()) {
                    warn!("Term '{}' references undeclared profile '{}'.", term.text, profile);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Term validation failed:\n{}", errors.join("\n")))
        }
    }
}

/// Merges a user configuration over the defaults.
///
/// User terms replace default terms with the same key in place; new user terms
/// are appended in file order. Profiles and allow lists are unioned. User
/// settings replace the default settings.
pub fn merge_configs(default_config: FilterConfig, user_config: Option<FilterConfig>) -> FilterConfig {
    debug!("merge_configs called. Initial default terms count: {}", default_config.terms.len());

    let Some(user_cfg) = user_config else {
        return default_config;
    };

    let FilterConfig { mut terms, mut profiles, mut allow_list, .. } = default_config;
    let mut positions: HashMap<String, usize> = terms.iter()
        .enumerate()
        .map(|(i, t)| (t.text.clone(), i))
        .collect();

    debug!("User config provided. Merging {} user terms.", user_cfg.terms.len());
    for user_term in user_cfg.terms {
        match positions.get(&user_term.text) {
            Some(&i) => terms[i] = user_term,
            None => {
                positions.insert(user_term.text.clone(), terms.len());
                terms.push(user_term);
            }
        }
    }

    union_into(&mut profiles, user_cfg.profiles);
    union_into(&mut allow_list.case_sensitive, user_cfg.allow_list.case_sensitive);
    union_into(&mut allow_list.case_insensitive, user_cfg.allow_list.case_insensitive);

    debug!("Final total terms after merge: {}", terms.len());

    FilterConfig {
        settings: user_cfg.settings,
        profiles,
        terms,
        allow_list,
    }
}

fn union_into(target: &mut Vec<String>, extra: Vec<String>) {
    for value in extra {
        if !target.contains(&value) {
            target.push(value);
        }
    }
}
