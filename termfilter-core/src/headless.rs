// File: termfilter-core/src/headless.rs

//! `headless.rs`
//! Convenience wrapper for one-shot, non-interactive filtering of a string.

use anyhow::Result;

use crate::config::{FilterConfig, ProfileId};
use crate::engine::FilterEngine;
use crate::engines::rewrite_engine::RewriteEngine;

/// Filters `content` with a throwaway engine and returns the rewritten text.
///
/// The configuration is validated first. The rewrite does not record
/// statistics.
///
/// # Arguments
///
/// * `config` - The merged FilterConfig (defaults + optional user overrides).
/// * `content` - The string to be filtered.
/// * `profile` - Which profile's terms to apply.
pub fn headless_rewrite_string(config: FilterConfig, content: &str, profile: &ProfileId) -> Result<String> {
    config.validate()?;
    let engine = RewriteEngine::new(config);
    let outcome = engine.rewrite(content, profile, false);
    Ok(outcome.filtered)
}
