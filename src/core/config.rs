//! Configuration module for `storyboard`

use crate::core::diagram::Direction;
use crate::core::render::{OutputFormat, DEFAULT_FORMATS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

const DIR_VARIABLE: &str = "$STORYBOARD";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Rank direction (LR, TB, BT, RL)
    pub direction: String,
    /// Output formats, one file per diagram each
    pub formats: Vec<String>,
    /// Graphviz executable; empty to auto-detect
    pub dot_command: String,
    /// Label fonts follow their line colour
    pub color_names: bool,
    /// Open rendered files afterwards
    pub open_viewer: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default().to_string(),
            formats: DEFAULT_FORMATS.iter().map(ToString::to_string).collect(),
            dot_command: String::new(),
            color_names: false,
            open_viewer: true,
        }
    }
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for rendered files; empty means next to the input file
    #[serde(default)]
    pub output_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Rendering settings
    #[serde(default)]
    pub render: RenderConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override output directory
    pub output_dir: Option<String>,
    /// Override rank direction
    pub direction: Option<String>,
    /// Override output formats
    pub formats: Option<Vec<String>>,
    /// Override Graphviz executable
    pub dot_command: Option<String>,
    /// Override label colouring
    pub color_names: Option<bool>,
    /// Override viewer opening
    pub open_viewer: Option<bool>,
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    value
        .trim()
        .parse::<bool>()
        .map_err(|_| format!("Invalid boolean value for '{key}': '{value}'"))
}

fn parse_format_list(value: &str) -> Result<Vec<String>, String> {
    let formats: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|format| !format.is_empty())
        .map(|format| {
            format
                .parse::<OutputFormat>()
                .map(|format| format.to_string())
                .map_err(|e| e.to_string())
        })
        .collect::<Result<_, _>>()?;
    if formats.is_empty() {
        return Err("At least one output format is required".to_string());
    }
    Ok(formats)
}

impl Config {
    /// Get the `$STORYBOARD` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/storyboard`
    /// - macOS: `~/Library/Application Support/storyboard`
    /// - Windows: `%APPDATA%\storyboard`
    #[must_use]
    pub fn get_storyboard_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("storyboard")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only fields that are empty here and set in the defaults are filled in,
    /// so upgrading adds new settings without touching existing ones.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }

        if self.render.direction.is_empty() && !defaults.render.direction.is_empty() {
            self.render.direction.clone_from(&defaults.render.direction);
            changed = true;
        }
        if self.render.formats.is_empty() && !defaults.render.formats.is_empty() {
            self.render.formats.clone_from(&defaults.render.formats);
            changed = true;
        }
        if self.render.dot_command.is_empty() && !defaults.render.dot_command.is_empty() {
            self.render
                .dot_command
                .clone_from(&defaults.render.dot_command);
            changed = true;
        }

        if self.paths.output_dir.is_empty() && !defaults.paths.output_dir.is_empty() {
            self.paths.output_dir.clone_from(&defaults.paths.output_dir);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Only non-`None` values replace config values; the file is not touched.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut config = Config::load();
    /// let overrides = ConfigOverrides {
    ///     direction: Some("TB".to_string()),
    ///     ..Default::default()
    /// };
    /// config.apply_overrides(&overrides);
    /// ```
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(output_dir) = &overrides.output_dir {
            self.paths.output_dir.clone_from(output_dir);
        }

        if let Some(direction) = &overrides.direction {
            self.render.direction.clone_from(direction);
        }
        if let Some(formats) = &overrides.formats {
            self.render.formats.clone_from(formats);
        }
        if let Some(dot_command) = &overrides.dot_command {
            self.render.dot_command.clone_from(dot_command);
        }
        if let Some(color_names) = overrides.color_names {
            self.render.color_names = color_names;
        }
        if let Some(open_viewer) = overrides.open_viewer {
            self.render.open_viewer = open_viewer;
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, in
    /// the directory returned by [`get_storyboard_dir`](Self::get_storyboard_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_storyboard_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$STORYBOARD` to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let storyboard_dir = Self::get_storyboard_dir();
            value.replace(DIR_VARIABLE, storyboard_dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields take their serde defaults; `$STORYBOARD` is expanded in
    /// path-like values.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.render.dot_command = Self::expand_variables(&config.render.dot_command);
        config.paths.output_dir = Self::expand_variables(&config.paths.output_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// Debug builds use `DefaultCLIConfigDebug.toml`, release builds
    /// `DefaultCLIConfigRelease.toml`.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).unwrap_or_default()
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: load it, merge missing fields from
    ///   defaults and save it back when something was added
    /// - On first run: create the config directory and save the defaults
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `direction`, `formats`
    /// (comma separated), `dot_command`, `color_names`, `open_viewer`,
    /// `output_dir`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "direction" => Some(self.render.direction.clone()),
            "formats" => Some(self.render.formats.join(",")),
            "dot_command" | "dot-command" => Some(self.render.dot_command.clone()),
            "color_names" | "color-names" => Some(self.render.color_names.to_string()),
            "open_viewer" | "open-viewer" => Some(self.render.open_viewer.to_string()),
            "output_dir" | "output-dir" => Some(self.paths.output_dir.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Values are validated: `level` must be a log level, `direction` one of
    /// LR/TB/BT/RL, `formats` a comma-separated list of Graphviz formats, and
    /// flags `true` or `false`.
    ///
    /// Note: This method updates the in-memory config. Call [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => {
                let level: crate::logger::Level = value.parse()?;
                self.logging.level = level.to_string();
            }
            "file" => self.logging.file = Self::expand_variables(value),
            "verbose" => self.logging.verbose = parse_bool(key, value)?,
            "direction" => {
                let direction: Direction = value.parse()?;
                self.render.direction = direction.to_string();
            }
            "formats" => self.render.formats = parse_format_list(value)?,
            "dot_command" | "dot-command" => {
                self.render.dot_command = Self::expand_variables(value);
            }
            "color_names" | "color-names" => self.render.color_names = parse_bool(key, value)?,
            "open_viewer" | "open-viewer" => self.render.open_viewer = parse_bool(key, value)?,
            "output_dir" | "output-dir" => self.paths.output_dir = Self::expand_variables(value),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "direction" => self.render.direction.clone_from(&defaults.render.direction),
            "formats" => self.render.formats.clone_from(&defaults.render.formats),
            "dot_command" | "dot-command" => self
                .render
                .dot_command
                .clone_from(&defaults.render.dot_command),
            "color_names" | "color-names" => self.render.color_names = defaults.render.color_names,
            "open_viewer" | "open-viewer" => self.render.open_viewer = defaults.render.open_viewer,
            "output_dir" | "output-dir" => {
                self.paths.output_dir.clone_from(&defaults.paths.output_dir);
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds when there is no file.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }

    /// Rank direction, falling back to left-to-right when unset or invalid
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.render.direction.parse().unwrap_or_default()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[render]")?;
        writeln!(f, "  direction = \"{}\"", self.render.direction)?;
        writeln!(f, "  formats = \"{}\"", self.render.formats.join(","))?;
        writeln!(f, "  dot_command = \"{}\"", self.render.dot_command)?;
        writeln!(f, "  color_names = {}", self.render.color_names)?;
        writeln!(f, "  open_viewer = {}", self.render.open_viewer)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  output_dir = \"{}\"", self.paths.output_dir)?;

        Ok(())
    }
}
