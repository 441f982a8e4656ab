//! Errors raised while loading and assembling a story

use thiserror::Error;

/// Everything that can go wrong between reading a TSV file and a finalized story
#[derive(Error, Debug)]
pub enum StoryError {
    /// The input file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The TSV stream is not valid delimited text
    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks one or more required columns
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// An entry was given a blank name
    #[error("empty {kind} name")]
    EmptyName {
        /// Entry type being created
        kind: &'static str,
    },

    /// A timeline or place name (or short name) is already taken
    #[error("{name} already is a timeline or place")]
    DuplicateLine {
        /// Conflicting name
        name: String,
    },

    /// A line short name collides with another line
    #[error("{name} needs a unique short name ({short_name} in conflict)")]
    DuplicateShortName {
        /// Line being created
        name: String,
        /// Conflicting short name
        short_name: String,
    },

    /// An event name is already used
    #[error("Event {} already happened", .name.to_uppercase())]
    DuplicateEvent {
        /// Conflicting event name
        name: String,
    },

    /// Two events share a timestamp on the same line
    #[error("There's already an event in {line} at {timestamp}")]
    TimestampTaken {
        /// Timeline or place name
        line: String,
        /// Conflicting timestamp
        timestamp: i64,
    },

    /// An event row names no timeline or place
    #[error("Insufficient information to create an event: {name} {timestamp}")]
    MissingLocation {
        /// Event name
        name: String,
        /// Raw timestamp cell
        timestamp: String,
    },

    /// An event refers to an unknown timeline or place
    #[error("{name} isn't a real place")]
    UnknownLine {
        /// Referenced name
        name: String,
    },

    /// An event timestamp is not an integer
    #[error("invalid timestamp '{value}' for event {event}")]
    InvalidTimestamp {
        /// Event name
        event: String,
        /// Raw timestamp cell
        value: String,
    },

    /// A timeline reaches the end of the timestamp range, leaving no room for
    /// its start or finish marker
    #[error("timeline {timeline} has no room for a marker beyond timestamp {timestamp}")]
    TimestampOutOfRange {
        /// Timeline name
        timeline: String,
        /// Earliest or latest timestamp on the timeline
        timestamp: i64,
    },

    /// A character name (or short name) is already taken
    #[error("A character named {name} already exists")]
    DuplicateCharacter {
        /// Conflicting name
        name: String,
    },

    /// A character refers to an unknown event
    #[error("{character} refers to unknown event '{event}'")]
    UnknownEvent {
        /// Character name
        character: String,
        /// Referenced event
        event: String,
    },

    /// A character tried to attend a timeline anchor or a start/finish marker
    #[error("{character} cannot attend a synchronization marker, {event}")]
    UnattendableEvent {
        /// Character name
        character: String,
        /// Event name
        event: String,
    },

    /// A combiner lists fewer than two characters
    #[error("Cannot create combiner {name}: too few characters.")]
    TooFewCombined {
        /// Combiner name
        name: String,
    },

    /// A combiner refers to an unknown character
    #[error("combiner {combiner} refers to unknown character '{name}'")]
    UnknownCharacter {
        /// Combiner name
        combiner: String,
        /// Referenced character
        name: String,
    },

    /// A combiner with the same members already exists
    #[error("A combiner with {members} already exists")]
    DuplicateCombiner {
        /// Member names, comma separated
        members: String,
    },

    /// Any of the above, tagged with the TSV line it came from
    #[error("line {line}: {source}")]
    AtLine {
        /// 1-based line number in the input file
        line: usize,
        /// Underlying error
        #[source]
        source: Box<StoryError>,
    },
}

impl StoryError {
    /// Tag this error with the TSV line it was raised on
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        Self::AtLine {
            line,
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let err = StoryError::MissingColumns(vec!["COLOR".to_string(), "SHORTNAME".to_string()]);
        assert_eq!(err.to_string(), "missing required column(s): COLOR, SHORTNAME");
    }

    #[test]
    fn test_at_line_wraps_message() {
        let err = StoryError::UnknownLine {
            name: "atlantis".to_string(),
        }
        .at_line(7);
        assert_eq!(err.to_string(), "line 7: atlantis isn't a real place");
    }

    #[test]
    fn test_duplicate_event_is_shouted() {
        let err = StoryError::DuplicateEvent {
            name: "party".to_string(),
        };
        assert_eq!(err.to_string(), "Event PARTY already happened");
    }
}
