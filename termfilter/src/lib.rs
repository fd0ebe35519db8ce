// termfilter/src/lib.rs
//! # termfilter CLI Application
//!
//! Command-line host for `termfilter-core`. It discovers and merges the user's
//! configuration, runs one of the `filter`, `scan` or `terms` subcommands, and
//! renders diffs and summaries on the terminal.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
pub mod utils;
