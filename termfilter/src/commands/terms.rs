//! `terms` command: shows the order in which a profile's terms are applied,
//! and which configured terms failed to compile.

use anyhow::Result;
use comfy_table::{presets, Table};
use std::io::Write;

use termfilter_core::{FilterEngine, MatchMethod, PatternShape, ProfileId, TermSet};

fn method_name(method: MatchMethod) -> &'static str {
    match method {
        MatchMethod::Exact => "exact",
        MatchMethod::Partial => "partial",
        MatchMethod::Whole => "whole",
        MatchMethod::Regex => "regex",
    }
}

pub fn build_terms_table(set: &TermSet) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::ASCII_BORDERS_ONLY_CONDENSED)
        .set_header(vec!["#", "Term", "Method", "Flags", "Substitutions"]);

    for (index, (key, term)) in set.iter().enumerate() {
        let mut flags = Vec::new();
        if term.match_repeated() {
            flags.push("repeat");
        }
        if term.match_separators() {
            flags.push("separators");
        }
        if term.shape() == PatternShape::Bounded {
            flags.push("bounded");
        }
        table.add_row(vec![
            (index + 1).to_string(),
            key.to_string(),
            method_name(term.match_method()).to_string(),
            flags.join(","),
            term.substitutions().join(", "),
        ]);
    }
    table
}

pub fn run_terms<W: Write>(engine: &dyn FilterEngine, profile: &ProfileId, writer: &mut W) -> Result<()> {
    let set = engine.term_set(profile);
    writeln!(writer, "Profile '{}': {} terms, longest first.", set.profile(), set.len())?;
    if !set.is_empty() {
        writeln!(writer, "{}", build_terms_table(&set))?;
    }

    if !set.rejected().is_empty() {
        writeln!(writer, "Rejected terms:")?;
        for error in set.rejected() {
            writeln!(writer, "  - {}", error)?;
        }
    }
    Ok(())
}
