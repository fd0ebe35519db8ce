// termfilter/src/utils/config_discovery.rs
//! Locates and loads the user's filter configuration.
//!
//! Lookup order: an explicit `--config` path, then `~/.termfilter/config.yaml`,
//! then `<platform config dir>/termfilter/config.yaml`. Whatever is found is
//! merged over the built-in defaults.

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

use termfilter_core::{merge_configs, FilterConfig};

const APP_DIR: &str = "termfilter";
const HOME_DIR: &str = ".termfilter";
const CONFIG_FILE: &str = "config.yaml";

/// Candidate user config locations, most specific first.
pub fn candidate_paths(home: Option<PathBuf>, config_dir: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = home {
        paths.push(home.join(HOME_DIR).join(CONFIG_FILE));
    }
    if let Some(dir) = config_dir {
        paths.push(dir.join(APP_DIR).join(CONFIG_FILE));
    }
    paths
}

/// Resolves which user config file to load, if any.
pub fn discover_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    candidate_paths(dirs::home_dir(), dirs::config_dir())
        .into_iter()
        .find(|p| p.is_file())
}

/// Loads the built-in defaults and merges the discovered user config over them.
///
/// An explicit path that cannot be read or parsed is an error; a missing
/// discovered file simply means defaults only.
pub fn load_config(explicit: Option<&Path>) -> Result<FilterConfig> {
    let defaults = FilterConfig::load_default_config()?;

    let user = match discover_config_path(explicit) {
        Some(path) => {
            info!("Using filter configuration at {}", path.display());
            let config = FilterConfig::load_from_file(&path)
                .with_context(|| format!("Failed to load filter configuration from {}", path.display()))?;
            Some(config)
        }
        None => {
            debug!("No user configuration found; using built-in terms only.");
            None
        }
    };

    let merged = merge_configs(defaults, user);
    merged.validate()?;
    Ok(merged)
}
