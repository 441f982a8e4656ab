//! CLI command handlers for `storyboard`.
//!
//! Each command is implemented in its own submodule and returns
//! `Err` with a ready-to-print `✗ ...` message on failure.

pub mod check;
pub mod config;
pub mod render;
