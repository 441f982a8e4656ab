//! Events: timeline anchors and the happenings characters attend

use super::{CharacterId, EventId, LineId};
use std::collections::{BTreeMap, BTreeSet};

/// Anchor or happening
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Synchronisation marker on a timeline; groups the happenings of its places
    Anchor {
        /// Happenings in the places of the timeline at the same timestamp
        children: Vec<EventId>,
    },
    /// Something that happens in a place
    Happening {
        /// Anchor on the owning timeline at the same timestamp
        anchor: EventId,
    },
}

/// Something that happened at a timestamp on a line
#[derive(Debug, Clone)]
pub struct Event {
    /// Display name
    pub name: String,
    /// Timeline (anchors) or place (happenings)
    pub line: LineId,
    /// Timestamp ordering the event on its line
    pub timestamp: i64,
    /// Graphviz colour, if any
    pub color: Option<String>,
    /// Anchor or happening
    pub kind: EventKind,
    /// How many times each character attends
    pub attendees: BTreeMap<CharacterId, usize>,
    /// Characters whose story starts here
    pub entrances: BTreeSet<CharacterId>,
    /// Characters whose story ends here
    pub exits: BTreeSet<CharacterId>,
    /// Start-of-timeline marker
    pub opener: bool,
    /// End-of-timeline marker
    pub closer: bool,
    /// Created automatically for a place of a timeline event
    pub generated: bool,
    /// Left out when drawing the friendship graph
    pub skip_in_friendship_graph: bool,
}

impl Event {
    /// Create an event with no attendees
    #[must_use]
    pub fn new(name: &str, line: LineId, timestamp: i64, kind: EventKind) -> Self {
        Self {
            name: name.trim().to_string(),
            line,
            timestamp,
            color: None,
            kind,
            attendees: BTreeMap::new(),
            entrances: BTreeSet::new(),
            exits: BTreeSet::new(),
            opener: false,
            closer: false,
            generated: false,
            skip_in_friendship_graph: false,
        }
    }

    /// Lowercased name used for lookups
    #[must_use]
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Whether this is a timeline anchor
    #[must_use]
    pub const fn is_anchor(&self) -> bool {
        matches!(self.kind, EventKind::Anchor { .. })
    }

    /// Start or finish marker
    #[must_use]
    pub const fn is_bookend(&self) -> bool {
        self.opener || self.closer
    }

    /// Characters may only attend happenings that are not start/finish markers
    #[must_use]
    pub const fn can_attend(&self) -> bool {
        match self.kind {
            EventKind::Anchor { .. } => false,
            EventKind::Happening { .. } => !self.is_bookend(),
        }
    }

    /// Anchor of a happening; an anchor is its own anchor
    #[must_use]
    pub const fn anchor(&self, own_id: EventId) -> EventId {
        match self.kind {
            EventKind::Happening { anchor } => anchor,
            EventKind::Anchor { .. } => own_id,
        }
    }

    /// Happenings grouped under an anchor
    #[must_use]
    pub fn children(&self) -> &[EventId] {
        match &self.kind {
            EventKind::Anchor { children } => children,
            EventKind::Happening { .. } => &[],
        }
    }

    /// Graphviz node name: dashes become line breaks
    #[must_use]
    pub fn node_name(&self) -> String {
        self.name.replace('-', "\n")
    }

    /// Name of the cluster drawn for an anchor
    #[must_use]
    pub fn cluster_name(&self) -> String {
        format!("cluster-{}-{}", self.line, self.timestamp)
    }

    /// Count one more visit by a character
    pub fn add_attendee(&mut self, character: CharacterId) {
        *self.attendees.entry(character).or_insert(0) += 1;
    }

    /// Visits by a character
    #[must_use]
    pub fn attendance(&self, character: CharacterId) -> usize {
        self.attendees.get(&character).copied().unwrap_or(0)
    }

    /// Everyone who attended
    pub fn roster(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.attendees.keys().copied()
    }

    /// Characters attending more than once
    pub fn loopers(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.attendees
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(character, _)| *character)
    }
}
