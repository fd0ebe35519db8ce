// termfilter/src/ui/diff_viewer.rs
//! Unified diff between the original and the filtered text.

use diffy::{create_patch, Line as DiffLine};
use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::ui::theme::{color_for, ThemeEntry, ThemeMap};

/// Writes a line-based diff of `original` against `filtered`.
///
/// Removed lines are prefixed `-`, added lines `+`, context lines two spaces.
pub fn print_diff<W: Write>(
    original: &str,
    filtered: &str,
    writer: &mut W,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    let header = "--- Diff View ---";
    let paint = |entry: ThemeEntry, text: String| -> String {
        if supports_color {
            text.color(color_for(entry, theme)).to_string()
        } else {
            text
        }
    };

    writeln!(writer, "{}", paint(ThemeEntry::DiffHeader, header.to_string()))?;

    let patch = create_patch(original, filtered);
    let mut changed = false;
    for hunk in patch.hunks() {
        for line in hunk.lines() {
            match line {
                DiffLine::Delete(s) => {
                    changed = true;
                    writeln!(writer, "{}", paint(ThemeEntry::DiffRemoved, format!("-{}", s.trim_end_matches('\n'))))?;
                }
                DiffLine::Insert(s) => {
                    changed = true;
                    writeln!(writer, "{}", paint(ThemeEntry::DiffAdded, format!("+{}", s.trim_end_matches('\n'))))?;
                }
                DiffLine::Context(s) => {
                    writeln!(writer, " {}", s.trim_end_matches('\n'))?;
                }
            }
        }
    }

    if !changed {
        writeln!(writer, "No changes detected.")?;
    }

    writeln!(writer, "{}", paint(ThemeEntry::DiffHeader, "-----------------".to_string()))?;
    Ok(())
}
