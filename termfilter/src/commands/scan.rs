//! `scan` command: a dry classification pass that reports matches without
//! rewriting the input or touching the engine's counters.

use anyhow::{bail, Result};
use is_terminal::IsTerminal;
use log::info;
use serde::Serialize;
use std::io::{self, Write};

use termfilter_core::{FilterEngine, MatchSummaryItem, ProfileId};

use crate::ui::match_summary;
use crate::ui::theme::ThemeMap;

pub struct ScanOptions {
    pub input: String,
    pub profile: ProfileId,
    pub json_stdout: bool,
    pub fail_over_threshold: Option<usize>,
    pub quiet: bool,
}

/// Machine-readable scan result printed by `--json-stdout`.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub profile: String,
    pub total_matches: usize,
    pub would_modify: bool,
    pub terms: Vec<MatchSummaryItem>,
}

pub fn build_report(engine: &dyn FilterEngine, input: &str, profile: &ProfileId) -> ScanReport {
    let outcome = engine.rewrite(input, profile, false);
    let terms = outcome.summary();
    ScanReport {
        profile: profile.to_string(),
        total_matches: outcome.matches.len(),
        would_modify: outcome.modified,
        terms,
    }
}

pub fn run_scan(engine: &dyn FilterEngine, opts: ScanOptions, theme: &ThemeMap) -> Result<()> {
    info!("Starting scan operation.");
    let report = build_report(engine, &opts.input, &opts.profile);

    if opts.json_stdout {
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &report)?;
        writeln!(stdout)?;
    } else if !opts.quiet {
        let supports_color = io::stderr().is_terminal();
        match_summary::print_summary(&report.terms, &mut io::stderr(), theme, supports_color)?;
    }

    if let Some(threshold) = opts.fail_over_threshold {
        if report.total_matches > threshold {
            bail!(
                "Found {} matches, exceeding the threshold of {}.",
                report.total_matches,
                threshold
            );
        }
    }

    info!("Scan operation completed.");
    Ok(())
}
