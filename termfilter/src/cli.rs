// termfilter/src/cli.rs
//! This file defines the command-line interface (CLI) for the termfilter
//! application, including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use termfilter_core::FilterMethod;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "termfilter",
    author = "Obscura Tech",
    version = env!("CARGO_PKG_VERSION"),
    about = "Censor, substitute, or remove configured terms from text",
    long_about = "termfilter rewrites text so that configured terms are censored, replaced with a substitute, or removed outright. Terms are matched exactly, partially, as whole words, or by regular expression, grouped into profiles, and protected against false positives by an allow list.",
    arg_required_else_help = true,
)]
pub struct Cli {
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `termfilter` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Rewrites an input file or stdin, filtering configured terms.")]
    Filter(FilterCommand),

    #[command(about = "Scans an input for configured terms and summarizes them without rewriting.")]
    Scan(ScanCommand),

    #[command(about = "Lists the compiled terms of a profile in the order they are applied.")]
    Terms(TermsCommand),
}

/// Options shared by every command that builds an engine.
#[derive(Parser, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a filter configuration file (YAML), merged over the built-in terms.
    #[arg(long = "config", value_name = "FILE", help = "Path to a filter configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Profile whose terms are applied. `all` or `*` selects every term.
    #[arg(long = "profile", short = 'p', value_name = "NAME", help = "Apply only the terms of this profile (default: all terms).")]
    pub profile: Option<String>,
}

/// Arguments for the `filter` command.
#[derive(Parser, Debug)]
pub struct FilterCommand {
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Overrides the configured filter method for this run.
    #[arg(long = "method", short = 'm', value_enum, value_name = "METHOD", help = "Override the configured filter method.")]
    pub method: Option<MethodChoice>,

    #[arg(long = "seed", value_name = "N", help = "Seed substitution choices so runs are reproducible.")]
    pub seed: Option<u64>,

    #[arg(long, short = 'D', help = "Show a unified diff to highlight the changes made.")]
    pub diff: bool,

    #[arg(long = "line-buffered", conflicts_with_all = ["input_file", "diff"], help = "Process stdin line by line (useful for streaming data from pipes).")]
    pub line_buffered: bool,

    #[arg(long = "no-summary", help = "Suppress the match summary.")]
    pub no_summary: bool,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Exit with a non-zero code if the total number of matches exceeds this threshold.
    #[arg(long = "fail-over-threshold", value_name = "N", help = "Exit with a non-zero code if the total number of matches exceeds this threshold.")]
    pub fail_over_threshold: Option<usize>,

    #[arg(long = "json-stdout", help = "Print the scan report to stdout as JSON.")]
    pub json_stdout: bool,
}

/// Arguments for the `terms` command.
#[derive(Parser, Debug)]
pub struct TermsCommand {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Filter methods selectable on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum MethodChoice {
    Off,
    Censor,
    Substitute,
    Remove,
}

impl From<MethodChoice> for FilterMethod {
    fn from(choice: MethodChoice) -> Self {
        match choice {
            MethodChoice::Off => FilterMethod::Off,
            MethodChoice::Censor => FilterMethod::Censor,
            MethodChoice::Substitute => FilterMethod::Substitute,
            MethodChoice::Remove => FilterMethod::Remove,
        }
    }
}
