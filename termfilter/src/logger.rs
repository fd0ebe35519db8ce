// termfilter/src/logger.rs
//! Logger setup for the termfilter binary.
//!
//! `RUST_LOG` is honored unless an explicit level is passed, in which case the
//! level applies to both workspace crates.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger. Repeated calls are ignored, so tests can
/// call this freely.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    builder.format_timestamp(None);

    if let Some(level) = level {
        builder
            .filter_module("termfilter", level)
            .filter_module("termfilter_core", level);
    }

    let _ = builder.is_test(cfg!(test)).try_init();
}
