//! Check command handler

use std::path::Path;
use storyboard::core::loader::load_story;
use storyboard::{error, info};

/// Load and finalize a story, then print its statistics
pub fn run(input_file: &Path, verbose: bool) -> Result<(), String> {
    let story = load_story(input_file)
        .and_then(|mut story| story.finalize().map(|()| story))
        .map_err(|e| {
            error!("Check failed for {}: {e}", input_file.display());
            format!("✗ {} is not a valid story: {e}", input_file.display())
        })?;

    if verbose {
        println!("✓ Story is valid: {}", input_file.display());
    } else {
        info!("Story checked: {}", input_file.display());
    }
    println!("{}", story.stats());
    Ok(())
}
