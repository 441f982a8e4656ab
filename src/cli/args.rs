//! CLI argument definitions for `storyboard`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use storyboard::config::ConfigOverrides;
use storyboard::core::diagram::Direction;
use storyboard::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

/// Rank direction of the storyline diagram
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum DirectionArg {
    /// Left to right
    #[value(name = "LR", alias = "lr")]
    Lr,
    /// Top to bottom
    #[value(name = "TB", alias = "tb")]
    Tb,
    /// Bottom to top
    #[value(name = "BT", alias = "bt")]
    Bt,
    /// Right to left
    #[value(name = "RL", alias = "rl")]
    Rl,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Lr => Self::LeftRight,
            DirectionArg::Tb => Self::TopBottom,
            DirectionArg::Bt => Self::BottomTop,
            DirectionArg::Rl => Self::RightLeft,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `direction`, `formats`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set (`formats` takes a comma separated list)
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Render the storyline and friendship diagrams of a story.
    ///
    /// Each requested format produces `<story>.gv.<fmt>` and
    /// `<story>~friendships.gv.<fmt>`.
    Render {
        /// Path to the tab-separated story file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Rendering direction (defaults to config `direction`)
        #[arg(short = 'd', long = "dir", value_enum)]
        direction: Option<DirectionArg>,

        /// Output format, repeatable (defaults to config `formats`)
        #[arg(short = 'o', long = "format", value_name = "FMT")]
        formats: Vec<String>,

        /// Do not open the rendered files
        #[arg(short, long)]
        quiet: bool,

        /// Draw names in their line colour
        #[arg(short, long)]
        color_names: bool,

        /// Also write the `.gv` DOT sources
        #[arg(long)]
        keep_source: bool,

        /// Graphviz executable to use
        #[arg(long = "dot", value_name = "CMD")]
        dot_command: Option<String>,
    },
    /// Load a story and print its statistics without rendering.
    Check {
        /// Path to the tab-separated story file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "storyboard",
    about = "Draw storylines and friendship graphs from tab-separated stories",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug", global = true)]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum, global = true)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH", global = true)]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new(), global = true)]
    pub config_verbose: Option<bool>,

    /// Override config output directory
    #[arg(long = "out-dir", value_name = "DIR", global = true)]
    pub out_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Global flags map onto the `[logging]` and `[paths]` sections; the
    /// `render` subcommand's flags map onto `[render]`. Flags that were not
    /// given leave the loaded configuration untouched.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            output_dir: self
                .out_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            ..ConfigOverrides::default()
        };

        if let Command::Render {
            direction,
            formats,
            quiet,
            color_names,
            dot_command,
            ..
        } = &self.command
        {
            overrides.direction = direction.map(|d| Direction::from(d).to_string());
            if !formats.is_empty() {
                overrides.formats = Some(formats.clone());
            }
            overrides.dot_command.clone_from(dot_command);
            if *color_names {
                overrides.color_names = Some(true);
            }
            if *quiet {
                overrides.open_viewer = Some(false);
            }
        }
        overrides
    }
}
