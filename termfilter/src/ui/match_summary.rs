// termfilter/src/ui/match_summary.rs
//! Per-term tables for the `filter` and `scan` commands.

use comfy_table::{presets, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::io::{self, Write};

use termfilter_core::MatchSummaryItem;

use crate::ui::theme::{color_for, ThemeEntry, ThemeMap};

const MAX_SAMPLES: usize = 3;

/// Distinct values in first-seen order, at most `MAX_SAMPLES` of them.
fn samples(values: &[String]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !seen.contains(&value.as_str()) {
            seen.push(value.as_str());
        }
        if seen.len() == MAX_SAMPLES {
            break;
        }
    }
    seen.join(", ")
}

pub fn build_summary_table(summary: &[MatchSummaryItem]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::ASCII_BORDERS_ONLY_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Term", "Occurrences", "Rewritten as"]);

    for item in summary {
        table.add_row(vec![
            Cell::new(&item.term_key),
            Cell::new(item.occurrences),
            Cell::new(samples(&item.rewritten_texts)),
        ]);
    }
    table
}

/// Prints the match summary, or a one-line note when nothing matched.
pub fn print_summary<W: Write>(
    summary: &[MatchSummaryItem],
    writer: &mut W,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    let header = "--- Match Summary ---";
    if supports_color {
        writeln!(writer, "{}", header.color(color_for(ThemeEntry::Header, theme)))?;
    } else {
        writeln!(writer, "{}", header)?;
    }

    if summary.is_empty() {
        writeln!(writer, "No configured terms found.")?;
        return Ok(());
    }

    writeln!(writer, "{}", build_summary_table(summary))?;
    let total: usize = summary.iter().map(|item| item.occurrences).sum();
    writeln!(writer, "Total: {} matches across {} terms.", total, summary.len())
}
