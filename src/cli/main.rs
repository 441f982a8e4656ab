//! Command-line interface entry point for `storyboard`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use std::process::ExitCode;
use storyboard::config::Config;
use storyboard::info;
use storyboard::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};

fn main() -> ExitCode {
    let args = Cli::parse();

    // The stored config is what `config` edits; overrides only shape this run
    let mut stored = Config::load();
    let defaults = Config::from_defaults();
    let config = run_config(&stored, &args);

    // CLI flag overrides config logging.level; fallback warn
    let effective_level = args
        .log_level
        .map(std::convert::Into::into)
        .or_else(|| config.logging.level.parse::<Level>().ok())
        .unwrap_or(Level::Warn);

    let mut level = effective_level;
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise use config logging.file if set
    let config_log_path: Option<std::path::PathBuf> = if config.logging.file.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(&config.logging.file))
    };

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let outcome = match args.command {
        Command::Config { subcommand } => commands::config::run(subcommand, &mut stored, &defaults),
        Command::Render {
            input_file,
            keep_source,
            ..
        } => commands::render::run(&input_file, keep_source, &config, verbose),
        Command::Check { input_file } => commands::check::run(&input_file, verbose),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// Stored config with this invocation's CLI overrides applied
fn run_config(stored: &Config, args: &Cli) -> Config {
    let mut config = stored.clone();
    config.apply_overrides(&args.to_config_overrides());
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_leave_stored_config_alone() {
        let stored = Config::from_defaults();
        let args = Cli::try_parse_from([
            "storyboard",
            "--out-dir",
            "/tmp/elsewhere",
            "--config-level",
            "error",
            "config",
            "set",
            "direction",
            "TB",
        ])
        .unwrap();

        let config = run_config(&stored, &args);

        assert_eq!(config.paths.output_dir, "/tmp/elsewhere");
        assert_eq!(config.logging.level, "error");
        assert_eq!(stored.paths.output_dir, Config::from_defaults().paths.output_dir);
        assert_eq!(stored.logging.level, Config::from_defaults().logging.level);
    }
}
