//! Timelines and places

use super::{BridgeId, EventId, LineId, SequenceEntry};
use std::collections::BTreeMap;

/// What kind of line this is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// A universe clock, grouping the places that share it
    Timeline {
        /// Places in creation order
        places: Vec<LineId>,
    },
    /// A location on a timeline
    Place {
        /// Owning timeline
        timeline: LineId,
    },
}

/// A timeline or a place: an ordered sequence of timestamped events
#[derive(Debug, Clone)]
pub struct Line {
    /// Display name
    pub name: String,
    /// Lowercased name used for lookups
    pub key: String,
    /// Name used on edge labels
    pub short_name: String,
    /// Graphviz colour, if any
    pub color: Option<String>,
    /// Timeline or place
    pub kind: LineKind,
    /// Events on this line; chronological once the story is finalized
    pub sequence: Vec<SequenceEntry>,
    /// Timestamp index of the events on this line
    pub timestamps: BTreeMap<i64, EventId>,
    /// Bridges between consecutive events
    pub bridges: Vec<BridgeId>,
}

impl Line {
    /// Create an empty line
    #[must_use]
    pub fn new(name: &str, short_name: &str, color: Option<String>, kind: LineKind) -> Self {
        let name = name.trim().to_string();
        let short_name = match short_name.trim() {
            "" => name.clone(),
            short => short.to_string(),
        };
        Self {
            key: name.to_lowercase(),
            name,
            short_name,
            color,
            kind,
            sequence: Vec::new(),
            timestamps: BTreeMap::new(),
            bridges: Vec::new(),
        }
    }

    /// Whether this line is a timeline
    #[must_use]
    pub const fn is_timeline(&self) -> bool {
        matches!(self.kind, LineKind::Timeline { .. })
    }

    /// Owning timeline of a place, `None` for timelines
    #[must_use]
    pub const fn timeline(&self) -> Option<LineId> {
        match self.kind {
            LineKind::Place { timeline } => Some(timeline),
            LineKind::Timeline { .. } => None,
        }
    }

    /// Places of a timeline (empty for places)
    #[must_use]
    pub fn places(&self) -> &[LineId] {
        match &self.kind {
            LineKind::Timeline { places } => places,
            LineKind::Place { .. } => &[],
        }
    }

    /// Events in sequence order
    pub fn events(&self) -> impl Iterator<Item = EventId> + '_ {
        self.sequence.iter().map(|entry| entry.event)
    }

    /// Earliest timestamp on this line
    #[must_use]
    pub fn first_timestamp(&self) -> Option<i64> {
        self.timestamps.keys().next().copied()
    }

    /// Latest timestamp on this line
    #[must_use]
    pub fn last_timestamp(&self) -> Option<i64> {
        self.timestamps.keys().next_back().copied()
    }

    /// Event at a timestamp
    #[must_use]
    pub fn event_at(&self, timestamp: i64) -> Option<EventId> {
        self.timestamps.get(&timestamp).copied()
    }

    /// Put the sequence into chronological order
    ///
    /// Timestamps are unique per line, so the timestamp index already holds
    /// the order; dash flags stay with their event.
    pub fn sort_events(&mut self) {
        let order: BTreeMap<EventId, i64> = self.timestamps.iter().map(|(t, e)| (*e, *t)).collect();
        self.sequence
            .sort_by_key(|entry| order.get(&entry.event).copied().unwrap_or(i64::MAX));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_defaults_to_name() {
        let line = Line::new("  Castle ", "", None, LineKind::Timeline { places: vec![] });
        assert_eq!(line.name, "Castle");
        assert_eq!(line.key, "castle");
        assert_eq!(line.short_name, "Castle");
        assert!(line.is_timeline());
        assert!(line.timeline().is_none());
    }

    #[test]
    fn test_sort_events_uses_timestamps() {
        let mut line = Line::new(
            "Docks",
            "D",
            Some("blue".to_string()),
            LineKind::Place {
                timeline: LineId(0),
            },
        );
        for (event, timestamp) in [(EventId(3), 30), (EventId(1), 10), (EventId(2), 20)] {
            line.sequence.push(SequenceEntry::new(event, true, true));
            line.timestamps.insert(timestamp, event);
        }

        line.sort_events();

        assert_eq!(
            line.events().collect::<Vec<_>>(),
            vec![EventId(1), EventId(2), EventId(3)]
        );
        assert_eq!(line.first_timestamp(), Some(10));
        assert_eq!(line.last_timestamp(), Some(30));
        assert_eq!(line.event_at(20), Some(EventId(2)));
        assert_eq!(line.timeline(), Some(LineId(0)));
        assert!(line.places().is_empty());
    }
}
