//! `filter` command: rewrites input and reports what was matched.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use termfilter_core::{FilterEngine, ProfileId, TermMatch};
use termfilter_core::term_match::summarize;

use crate::ui::output_format::info_msg;
use crate::ui::theme::ThemeMap;
use crate::ui::{diff_viewer, match_summary};

/// Options for a whole-input `filter` run.
pub struct FilterOptions {
    pub input: String,
    pub profile: ProfileId,
    pub diff: bool,
    pub output_path: Option<PathBuf>,
    pub no_summary: bool,
    pub quiet: bool,
}

pub fn run_filter(engine: &dyn FilterEngine, opts: FilterOptions, theme: &ThemeMap) -> Result<()> {
    info!("Starting filter operation.");

    let outcome = engine.rewrite(&opts.input, &opts.profile, true);
    debug!(
        "Input filtered. Original length: {}, filtered length: {}",
        opts.input.len(),
        outcome.filtered.len()
    );

    write_primary_output(&opts, &outcome.filtered, theme)?;

    if !opts.no_summary && !opts.quiet {
        let supports_color = io::stderr().is_terminal();
        match_summary::print_summary(&outcome.summary(), &mut io::stderr(), theme, supports_color)?;
    }

    info!("Filter operation completed.");
    Ok(())
}

fn write_primary_output(opts: &FilterOptions, filtered: &str, theme: &ThemeMap) -> Result<()> {
    match &opts.output_path {
        Some(path) => {
            if !opts.quiet {
                info_msg(format!("Writing filtered content to file: {}", path.display()), theme);
            }
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            if opts.diff {
                diff_viewer::print_diff(&opts.input, filtered, &mut file, theme, false)?;
            } else {
                write_text(&mut file, filtered)?;
            }
        }
        None => {
            let stdout = io::stdout();
            let supports_color = stdout.is_terminal();
            let mut writer = stdout.lock();
            if opts.diff {
                diff_viewer::print_diff(&opts.input, filtered, &mut writer, theme, supports_color)?;
            } else {
                write_text(&mut writer, filtered)?;
            }
        }
    }
    Ok(())
}

/// Writes `text`, terminated by exactly one trailing newline.
fn write_text<W: Write>(writer: &mut W, text: &str) -> io::Result<()> {
    if text.ends_with('\n') {
        write!(writer, "{}", text)
    } else {
        writeln!(writer, "{}", text)
    }
}

/// Filters a single line, as used by streaming mode.
pub fn filter_single_line(line: &str, engine: &dyn FilterEngine, profile: &ProfileId) -> (String, Vec<TermMatch>) {
    let outcome = engine.rewrite(line, profile, true);
    (outcome.filtered, outcome.matches)
}

/// Filters `reader` line by line, flushing each line as soon as it is written.
///
/// Returns every match seen so the caller can print one summary at the end.
pub fn run_line_buffered<R: BufRead, W: Write>(
    engine: &dyn FilterEngine,
    profile: &ProfileId,
    reader: R,
    writer: &mut W,
) -> Result<Vec<TermMatch>> {
    let mut all_matches = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read line from input")?;
        let (filtered, matches) = filter_single_line(&line, engine, profile);
        writeln!(writer, "{}", filtered)?;
        writer.flush()?;
        all_matches.extend(matches);
    }
    Ok(all_matches)
}

/// Streaming variant of `run_filter` reading stdin and writing stdout.
pub fn run_filter_line_buffered(
    engine: &dyn FilterEngine,
    profile: &ProfileId,
    no_summary: bool,
    quiet: bool,
    theme: &ThemeMap,
) -> Result<()> {
    info!("Starting line-buffered filter operation.");
    let stdin = io::stdin();
    let stdout = io::stdout();
    let matches = run_line_buffered(engine, profile, stdin.lock(), &mut stdout.lock())?;

    if !no_summary && !quiet {
        let supports_color = io::stderr().is_terminal();
        match_summary::print_summary(&summarize(&matches), &mut io::stderr(), theme, supports_color)?;
    }
    Ok(())
}
