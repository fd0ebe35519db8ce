// termfilter/src/commands/mod.rs
//! Subcommand implementations plus the plumbing they share.

pub mod filter;
pub mod scan;
pub mod terms;

use anyhow::{Context, Result};
use log::debug;
use std::io::{self, Read};
use std::path::Path;

use termfilter_core::ProfileId;

/// Parses `--profile`; absent means every term.
pub fn parse_profile(name: Option<&str>) -> Result<ProfileId> {
    match name {
        None => Ok(ProfileId::All),
        Some(name) => name
            .parse::<ProfileId>()
            .with_context(|| format!("Invalid profile name '{}'", name)),
    }
}

/// Reads the whole input from `path`, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            debug!("Reading input from file: {}", path.display());
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            debug!("Reading input from stdin...");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_defaults_to_all() {
        assert_eq!(parse_profile(None).unwrap(), ProfileId::All);
        assert_eq!(parse_profile(Some("*")).unwrap(), ProfileId::All);
        assert_eq!(parse_profile(Some("kids")).unwrap(), ProfileId::named("kids"));
        assert!(parse_profile(Some("")).is_err());
    }
}
