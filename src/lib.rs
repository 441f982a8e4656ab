//! Library for `storyboard`
//! Loads tab-separated story outlines and turns them into Graphviz diagrams.

pub mod core;
pub mod logger;

pub use core::config;
pub use core::get_version;
