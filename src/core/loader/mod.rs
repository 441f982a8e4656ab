//! Story loading: TSV rows dispatched into a [`Storyboard`]

pub mod tsv_parser;

pub use tsv_parser::{read_story_rows, StoryRow, REQUIRED_COLUMNS};

use crate::core::error::StoryError;
use crate::core::storyboard::Storyboard;
use crate::{debug, warn};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Entry types understood in the `TYPE` column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Timeline with its places
    Timeline,
    /// Event on a timeline or place
    Event,
    /// Character attending events
    Character,
    /// Same as a character
    Object,
    /// Group of characters sharing a line
    Combiner,
    /// Ignored
    Comment,
}

impl FromStr for RowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TIMELINE" => Ok(Self::Timeline),
            "EVENT" => Ok(Self::Event),
            "CHARACTER" => Ok(Self::Character),
            "OBJECT" => Ok(Self::Object),
            "COMBINER" => Ok(Self::Combiner),
            "COMMENT" => Ok(Self::Comment),
            _ => Err(format!("Unknown entry type: '{s}'")),
        }
    }
}

/// Load a story file without finalizing it
///
/// The story is named after the file stem.
///
/// # Errors
/// Returns an error if the file cannot be read or any entry is invalid.
pub fn load_story<P: AsRef<Path>>(path: P) -> Result<Storyboard, StoryError> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map_or_else(|| "storyboard".to_string(), |stem| stem.to_string_lossy().into_owned());
    debug!("Loading story {} from {}", name, path.display());
    let file = File::open(path)?;
    load_story_from_reader(&name, BufReader::new(file))
}

/// Load a story from any tab-separated source
///
/// # Errors
/// Returns an error if the input is malformed or any entry is invalid; entry
/// errors carry their line number.
pub fn load_story_from_reader<R: Read>(name: &str, reader: R) -> Result<Storyboard, StoryError> {
    let mut story = Storyboard::new(name);
    let mut entry = 0;
    for row in read_story_rows(reader)? {
        let kind = match row.kind.parse::<RowKind>() {
            Ok(kind) => kind,
            Err(e) => {
                warn!("line {}: {}, skipped", row.line, e);
                continue;
            }
        };
        entry += 1;
        apply_row(&mut story, kind, &row, entry).map_err(|e| e.at_line(row.line))?;
    }
    Ok(story)
}

/// Apply one entry to a story
///
/// # Errors
/// Returns whatever the matching `Storyboard` constructor rejects.
pub fn apply_row(
    story: &mut Storyboard,
    kind: RowKind,
    row: &StoryRow,
    entry: usize,
) -> Result<(), StoryError> {
    let color = row.color.clone();
    match kind {
        RowKind::Timeline => {
            story.create_timeline(&row.name, &row.short_name, &row.args, color)?;
        }
        RowKind::Event => {
            story.create_event(&row.name, &row.short_name, &row.args, color)?;
        }
        RowKind::Character | RowKind::Object => {
            story.create_character(&row.name, &row.short_name, &row.args, color)?;
        }
        RowKind::Combiner => {
            story.create_combiner(&row.name, &row.short_name, &row.args, color, entry)?;
        }
        RowKind::Comment => {}
    }
    Ok(())
}
