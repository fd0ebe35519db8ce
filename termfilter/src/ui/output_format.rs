// termfilter/src/ui/output_format.rs
//! Prefixed, optionally colored status messages for stderr.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::ui::theme::{color_for, ThemeEntry, ThemeMap};

fn print_message<W: Write>(
    writer: &mut W,
    prefix: &str,
    msg: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    let line = format!("{} {}", prefix, msg);
    if supports_color {
        writeln!(writer, "{}", line.color(color_for(entry, theme)))
    } else {
        writeln!(writer, "{}", line)
    }
}

pub fn print_info_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "[termfilter]", msg, ThemeEntry::Info, theme, supports_color)
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "[termfilter] WARNING:", msg, ThemeEntry::Warn, theme, supports_color)
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "[termfilter] ERROR:", msg, ThemeEntry::Error, theme, supports_color)
}

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let supports_color = io::stderr().is_terminal();
    let _ = print_info_message(&mut io::stderr(), msg.as_ref(), theme, supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let supports_color = io::stderr().is_terminal();
    let _ = print_warn_message(&mut io::stderr(), msg.as_ref(), theme, supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let supports_color = io::stderr().is_terminal();
    let _ = print_error_message(&mut io::stderr(), msg.as_ref(), theme, supports_color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::default_theme_map;

    #[test]
    fn plain_messages_carry_prefix_without_escapes() {
        let theme = default_theme_map();
        let mut buf = Vec::new();
        print_warn_message(&mut buf, "term 'x' skipped", &theme, false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "[termfilter] WARNING: term 'x' skipped\n");
    }

    #[test]
    fn colored_messages_contain_ansi_codes() {
        let theme = default_theme_map();
        let mut buf = Vec::new();
        print_error_message(&mut buf, "boom", &theme, true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("[termfilter] ERROR: boom"));
    }
}
