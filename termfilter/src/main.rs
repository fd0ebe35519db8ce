// termfilter/src/main.rs
//! termfilter entry point.
//!
//! Parses flags, sets up logging and the theme, builds the engine from the
//! merged configuration and dispatches to the chosen subcommand.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use termfilter::cli::{Cli, Commands, ConfigArgs};
use termfilter::commands::filter::{run_filter, run_filter_line_buffered, FilterOptions};
use termfilter::commands::scan::{run_scan, ScanOptions};
use termfilter::commands::terms::run_terms;
use termfilter::commands::{parse_profile, read_input};
use termfilter::logger;
use termfilter::ui::output_format::{error_msg, warn_msg};
use termfilter::ui::theme::{build_theme_map, default_theme_map, ThemeMap};
use termfilter::utils::config_discovery::load_config;
use termfilter_core::{FilterConfig, FilterEngine, ProfileId, RandomSelector, RewriteEngine, SeededSelector, SubstitutionSelector};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Some(LevelFilter::Off)
    } else if cli.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);
    info!("termfilter started. Version: {}", env!("CARGO_PKG_VERSION"));

    let theme = match build_theme_map(cli.theme.as_deref()) {
        Ok(theme) => theme,
        Err(e) => {
            let fallback = default_theme_map();
            error_msg(format!("{:#}", e), &fallback);
            return ExitCode::FAILURE;
        }
    };

    match run(cli, &theme) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error_msg(format!("{:#}", e), &theme);
            ExitCode::FAILURE
        }
    }
}

fn load_engine_config(args: &ConfigArgs) -> Result<(FilterConfig, ProfileId)> {
    let config = load_config(args.config.as_deref())?;
    let profile = parse_profile(args.profile.as_deref())?;
    Ok((config, profile))
}

/// Warns about an undeclared profile and about terms the profile had to leave out.
fn report_rejected(engine: &dyn FilterEngine, profile: &ProfileId, quiet: bool, theme: &ThemeMap) {
    if quiet {
        return;
    }
    let config = engine.config();
    if config.settings.profiles_enabled {
        if let Err(e) = config.check_profile(profile) {
            warn_msg(format!("{}; no terms will be applied.", e), theme);
        }
    }

    let rejected = engine.term_set(profile).rejected().len();
    if rejected > 0 {
        warn_msg(
            format!("{} configured term(s) could not be compiled and were skipped. Run `termfilter terms` for details.", rejected),
            theme,
        );
    }
}

fn run(cli: Cli, theme: &ThemeMap) -> Result<()> {
    let quiet = cli.quiet;

    match cli.command {
        Commands::Filter(cmd) => {
            let (mut config, profile) = load_engine_config(&cmd.config)?;
            if let Some(method) = cmd.method {
                config.settings.filter_method = method.into();
            }
            let selector: Arc<dyn SubstitutionSelector> = match cmd.seed {
                Some(seed) => Arc::new(SeededSelector::new(seed)),
                None => Arc::new(RandomSelector),
            };
            let engine = RewriteEngine::with_selector(config, selector);
            report_rejected(&engine, &profile, quiet, theme);

            if cmd.line_buffered {
                return run_filter_line_buffered(&engine, &profile, cmd.no_summary, quiet, theme);
            }

            let input = read_input(cmd.input_file.as_deref())?;
            let opts = FilterOptions {
                input,
                profile,
                diff: cmd.diff,
                output_path: cmd.output,
                no_summary: cmd.no_summary,
                quiet,
            };
            run_filter(&engine, opts, theme)
        }
        Commands::Scan(cmd) => {
            let (config, profile) = load_engine_config(&cmd.config)?;
            let engine = RewriteEngine::new(config);
            report_rejected(&engine, &profile, quiet || cmd.json_stdout, theme);

            let input = read_input(cmd.input_file.as_deref())?;
            let opts = ScanOptions {
                input,
                profile,
                json_stdout: cmd.json_stdout,
                fail_over_threshold: cmd.fail_over_threshold,
                quiet,
            };
            run_scan(&engine, opts, theme)
        }
        Commands::Terms(cmd) => {
            let (config, profile) = load_engine_config(&cmd.config)?;
            let engine = RewriteEngine::new(config);
            run_terms(&engine, &profile, &mut io::stdout().lock())
                .context("Failed to write term listing")
        }
    }
}
