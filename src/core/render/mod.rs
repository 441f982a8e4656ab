//! Rendering: DOT sources handed to Graphviz, one file per diagram and format
//!
//! The story is finalized and both diagrams are built before anything is
//! written, so a story that fails to assemble leaves the output directory
//! untouched.

pub mod graphviz;
pub mod viewer;

pub use graphviz::GraphvizRenderer;
pub use viewer::open_files;

use crate::core::diagram::{friendship_graph, storyline_graph, DiagramOptions};
use crate::core::error::StoryError;
use crate::core::storyboard::Storyboard;
use crate::{debug, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Output formats understood by Graphviz `dot -T`
pub const GRAPHVIZ_FORMATS: &[&str] = &[
    "bmp", "canon", "cgimage", "cmap", "cmapx", "cmapx_np", "dot", "dot_json", "eps", "exr",
    "fig", "gd", "gd2", "gif", "gtk", "gv", "ico", "imap", "imap_np", "ismap", "jp2", "jpe",
    "jpeg", "jpg", "json", "json0", "mp", "pct", "pdf", "pic", "pict", "plain", "plain-ext",
    "png", "pov", "ps", "ps2", "psd", "sgi", "svg", "svgz", "tga", "tif", "tiff", "tk", "vdx",
    "vml", "vmlz", "vrml", "wbmp", "webp", "x11", "xdot", "xdot1.2", "xdot1.4", "xdot_json",
    "xlib",
];

/// Formats rendered when none are configured
pub const DEFAULT_FORMATS: [&str; 2] = ["svg", "pdf"];

/// Errors raised while rendering
#[derive(Error, Debug)]
pub enum RenderError {
    /// Writing outputs failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The story could not be finalized
    #[error(transparent)]
    Story(#[from] StoryError),

    /// No usable Graphviz executable
    #[error("Graphviz 'dot' not found. Install Graphviz or pass --dot <path>")]
    DotNotFound,

    /// `dot` exited with an error
    #[error("dot failed to render {format}: {stderr}")]
    DotFailed {
        /// Requested format
        format: String,
        /// Captured error output
        stderr: String,
    },

    /// A format Graphviz does not know
    #[error("Invalid output format: {0}")]
    InvalidFormat(String),

    /// Every requested format was invalid
    #[error("No valid output format requested")]
    NoFormats,
}

/// A validated Graphviz output format
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputFormat(String);

impl OutputFormat {
    /// File extension (and `-T` argument)
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.0
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = s.trim().to_lowercase();
        if GRAPHVIZ_FORMATS.contains(&format.as_str()) {
            Ok(Self(format))
        } else {
            Err(RenderError::InvalidFormat(s.trim().to_string()))
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate requested formats, skipping invalid ones and repeats with a warning
///
/// Blank entries are ignored.
#[must_use]
pub fn parse_formats<S: AsRef<str>>(requested: &[S]) -> Vec<OutputFormat> {
    let mut formats: Vec<OutputFormat> = Vec::new();
    for raw in requested {
        let raw = raw.as_ref();
        if raw.trim().is_empty() {
            continue;
        }
        match raw.parse::<OutputFormat>() {
            Ok(format) if !formats.contains(&format) => formats.push(format),
            Ok(_) => {}
            Err(e) => warn!("Skipping {}", e),
        }
    }
    formats
}

/// Turns DOT source into an output file
pub trait Renderer {
    /// Render `dot_source` as `format` into `output_path`
    ///
    /// # Errors
    /// Returns an error if the output cannot be produced.
    fn render(
        &self,
        dot_source: &str,
        format: &OutputFormat,
        output_path: &Path,
    ) -> Result<(), RenderError>;
}

/// The two diagrams produced for a story
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramKind {
    /// Timelines, places and character lines
    Storyline,
    /// Who meets whom
    Friendship,
}

impl DiagramKind {
    /// Output file stem, e.g. `tale.gv` or `tale~friendships.gv`
    #[must_use]
    pub fn file_stem(self, story_name: &str) -> String {
        match self {
            Self::Storyline => format!("{story_name}.gv"),
            Self::Friendship => format!("{story_name}~friendships.gv"),
        }
    }
}

/// Where and how to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Directory receiving every output file
    pub output_dir: PathBuf,
    /// Formats to render, each producing one file per diagram
    pub formats: Vec<OutputFormat>,
    /// Also write the DOT sources
    pub keep_source: bool,
    /// Direction and label colouring
    pub diagram: DiagramOptions,
}

impl RenderOptions {
    /// Options rendering the default formats into `output_dir`
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            formats: parse_formats(&DEFAULT_FORMATS),
            keep_source: false,
            diagram: DiagramOptions::default(),
        }
    }
}

/// Finalize a story and render both diagrams in every requested format
///
/// Returns the rendered files (DOT sources excluded), storyline first for
/// each format.
///
/// # Errors
/// Returns an error if the story cannot be finalized, no format is valid, the
/// output directory cannot be written, or the renderer fails.
pub fn render_story(
    story: &mut Storyboard,
    renderer: &dyn Renderer,
    options: &RenderOptions,
) -> Result<Vec<PathBuf>, RenderError> {
    story.finalize()?;
    if options.formats.is_empty() {
        return Err(RenderError::NoFormats);
    }

    let diagrams = [
        (
            DiagramKind::Storyline,
            storyline_graph(story, &options.diagram).to_dot(),
        ),
        (DiagramKind::Friendship, friendship_graph(story).to_dot()),
    ];

    fs::create_dir_all(&options.output_dir)?;
    if options.keep_source {
        for (kind, source) in &diagrams {
            let path = options.output_dir.join(kind.file_stem(&story.name));
            fs::write(&path, source)?;
            debug!("Wrote {}", path.display());
        }
    }

    let mut rendered = Vec::new();
    for format in &options.formats {
        for (kind, source) in &diagrams {
            let path = options
                .output_dir
                .join(format!("{}.{}", kind.file_stem(&story.name), format.extension()));
            renderer.render(source, format, &path)?;
            info!("Rendered {}", path.display());
            rendered.push(path);
        }
    }
    Ok(rendered)
}
