//! Core module: story model, TSV loading, diagram generation and rendering

pub mod config;
pub mod diagram;
pub mod error;
pub mod loader;
pub mod models;
pub mod render;
pub mod storyboard;

pub use error::StoryError;
pub use storyboard::{StoryStats, Storyboard};

/// Returns the current version of the `storyboard` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
