//! Integration tests for configuration management

use std::fs;
use std::path::PathBuf;
use storyboard::config::{Config, ConfigOverrides};
use storyboard::core::diagram::Direction;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert_eq!(config.render.direction, "LR");
    assert_eq!(config.render.formats, vec!["svg", "pdf"]);
    assert!(config.paths.output_dir.is_empty());
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[render]
direction = "TB"
formats = ["png"]
dot_command = "/opt/graphviz/dot"
color_names = true
open_viewer = false

[paths]
output_dir = "./out"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.direction(), Direction::TopBottom);
    assert_eq!(config.render.formats, vec!["png"]);
    assert_eq!(config.render.dot_command, "/opt/graphviz/dot");
    assert!(config.render.color_names);
    assert!(!config.render.open_viewer);
    assert_eq!(config.paths.output_dir, "./out");
}

#[test]
fn test_config_from_toml_partial() {
    // Missing sections and fields use defaults
    let toml_str = r#"
[logging]
level = "error"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.render.formats, vec!["svg", "pdf"]);
    assert!(config.render.open_viewer);
    assert_eq!(config.direction(), Direction::LeftRight);
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$STORYBOARD/test.log"

[paths]
output_dir = "$STORYBOARD/out"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("storyboard"));
    assert!(!config.logging.file.contains("$STORYBOARD"));
    assert!(config.paths.output_dir.ends_with("out"));
    assert!(!config.paths.output_dir.contains("$STORYBOARD"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config
        .set("verbose", "true")
        .expect("Failed to set verbose");
    assert_eq!(config.get("verbose").unwrap(), "true");
    assert!(config.logging.verbose);

    config.set("direction", "bt").expect("Failed to set direction");
    assert_eq!(config.get("direction").unwrap(), "BT");

    config
        .set("formats", "png, svg")
        .expect("Failed to set formats");
    assert_eq!(config.get("formats").unwrap(), "png,svg");

    config
        .set("open_viewer", "false")
        .expect("Failed to set open_viewer");
    assert!(!config.render.open_viewer);

    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
}

#[test]
fn test_config_set_rejects_invalid_values() {
    let mut config = Config::from_defaults();

    assert!(config.set("level", "loud").is_err());
    assert!(config.set("direction", "sideways").is_err());
    assert!(config.set("formats", "svg,docx").is_err());
    assert!(config.set("color_names", "maybe").is_err());
    assert_eq!(config.render.formats, vec!["svg", "pdf"]);
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("level", "debug").expect("Failed to set level");
    config.set("formats", "png").expect("Failed to set formats");

    config
        .unset("level", &defaults)
        .expect("Failed to unset level");
    config
        .unset("formats", &defaults)
        .expect("Failed to unset formats");
    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.render.formats, defaults.render.formats);
    assert!(config.unset("unknown_key", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config.set("direction", "RL").expect("Failed to set direction");

    // Save to the test location rather than the user's config directory
    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let loaded_config = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded_config.logging.level, "info");
    assert_eq!(loaded_config.direction(), Direction::RightLeft);
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        output_dir: Some("./custom_out".to_string()),
        direction: Some("TB".to_string()),
        formats: Some(vec!["png".to_string()]),
        dot_command: Some("/usr/local/bin/dot".to_string()),
        color_names: Some(true),
        open_viewer: Some(false),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.output_dir, "./custom_out");
    assert_eq!(config.direction(), Direction::TopBottom);
    assert_eq!(config.render.formats, vec!["png"]);
    assert_eq!(config.render.dot_command, "/usr/local/bin/dot");
    assert!(config.render.color_names);
    assert!(!config.render.open_viewer);
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let before = config.render.formats.clone();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..ConfigOverrides::default()
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.render.formats, before);
}

#[test]
fn test_config_display_format() {
    let config = Config::from_defaults();
    let display_str = format!("{config}");

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[render]"));
    assert!(display_str.contains("[paths]"));

    assert!(display_str.contains("level"));
    assert!(display_str.contains("direction"));
    assert!(display_str.contains("output_dir"));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = ""
file = ""
verbose = false

[render]
direction = ""
formats = []
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    let changed = config.merge_defaults(&defaults);

    assert!(
        changed,
        "merge_defaults should return true when fields are added"
    );
    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.render.direction, "LR");
    assert_eq!(config.render.formats, vec!["svg", "pdf"]);
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"
verbose = false

[render]
direction = "BT"
formats = ["png"]
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    let defaults = Config::from_defaults();

    config.merge_defaults(&defaults);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.render.direction, "BT");
    assert_eq!(config.render.formats, vec!["png"]);
}

#[test]
fn test_get_storyboard_dir() {
    let dir = Config::get_storyboard_dir();

    assert!(dir.to_string_lossy().contains("storyboard"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
