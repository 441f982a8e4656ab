//! Render command handler

use std::path::{Path, PathBuf};
use storyboard::config::Config;
use storyboard::core::diagram::DiagramOptions;
use storyboard::core::loader::load_story;
use storyboard::core::render::{
    open_files, parse_formats, render_story, GraphvizRenderer, RenderOptions,
};
use storyboard::{error, info};

/// Render the storyline and friendship diagrams of one story file.
///
/// # Arguments
/// * `input_file` - Tab-separated story file
/// * `keep_source` - Also write the `.gv` DOT sources
/// * `config` - Configuration with CLI overrides already applied
/// * `verbose` - Whether to print progress messages
pub fn run(
    input_file: &Path,
    keep_source: bool,
    config: &Config,
    verbose: bool,
) -> Result<(), String> {
    let mut story = load_story(input_file).map_err(|e| {
        error!("Failed to load story {}: {e}", input_file.display());
        format!("✗ Failed to load {}: {e}", input_file.display())
    })?;

    if verbose {
        println!("✓ Story loaded successfully from: {}", input_file.display());
    } else {
        info!("Story loaded: {}", input_file.display());
    }

    let formats = parse_formats(&config.render.formats);
    let options = RenderOptions {
        output_dir: output_dir(input_file, config),
        formats,
        keep_source,
        diagram: DiagramOptions {
            direction: config.direction(),
            color_names: config.render.color_names,
        },
    };

    let renderer = if config.render.dot_command.is_empty() {
        GraphvizRenderer::new()
    } else {
        GraphvizRenderer::with_command(&config.render.dot_command)
    };

    let files = render_story(&mut story, &renderer, &options).map_err(|e| {
        error!("Rendering failed for {}: {e}", input_file.display());
        format!("✗ Failed to render {}: {e}", input_file.display())
    })?;

    for file in &files {
        println!("✓ Rendered: {}", file.display());
    }
    println!("{}", story.stats());

    if config.render.open_viewer {
        open_files(&files);
    }
    Ok(())
}

/// Configured output directory, or the directory holding the input file
fn output_dir(input_file: &Path, config: &Config) -> PathBuf {
    if !config.paths.output_dir.is_empty() {
        return PathBuf::from(&config.paths.output_dir);
    }
    match input_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_dir_defaults_to_input_directory() {
        let mut config = Config::default();
        assert_eq!(
            output_dir(Path::new("stories/tale.tsv"), &config),
            PathBuf::from("stories")
        );
        assert_eq!(output_dir(Path::new("tale.tsv"), &config), PathBuf::from("."));

        config.paths.output_dir = "/tmp/out".to_string();
        assert_eq!(
            output_dir(Path::new("stories/tale.tsv"), &config),
            PathBuf::from("/tmp/out")
        );
    }

    #[test]
    fn test_missing_story_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&dir.path().join("nope.tsv"), false, &Config::default(), false).unwrap_err();
        assert!(err.starts_with("✗ Failed to load"));
    }
}
