//! Data models for stories
//!
//! Every entity lives in an arena owned by [`Storyboard`](crate::core::Storyboard)
//! and is referred to by a typed index.

pub mod bridge;
pub mod character;
pub mod event;
pub mod line;

pub use bridge::{Bridge, BridgeStyle, Connector};
pub use character::{Character, Combiner};
pub use event::{Event, EventKind};
pub use line::{Line, LineKind};

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl $name {
            /// Position of the entity in its arena
            #[must_use]
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

arena_id!(
    /// Index of a timeline or place
    LineId
);
arena_id!(
    /// Index of an event (anchor or happening)
    EventId
);
arena_id!(
    /// Index of a character or object
    CharacterId
);
arena_id!(
    /// Index of a combiner
    CombinerId
);
arena_id!(
    /// Index of a bridge
    BridgeId
);

/// One step of an event sequence, with the dash flags of its two links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceEntry {
    /// Event visited at this step
    pub event: EventId,
    /// Dash the link arriving from the previous step
    pub dash_from_previous: bool,
    /// Dash the link leaving for the next step
    pub dash_to_next: bool,
}

impl SequenceEntry {
    /// Create a sequence entry
    #[must_use]
    pub const fn new(event: EventId, dash_from_previous: bool, dash_to_next: bool) -> Self {
        Self {
            event,
            dash_from_previous,
            dash_to_next,
        }
    }
}

/// A link between two consecutive entries of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceLink {
    /// 1-based position of the link in its sequence
    pub index: usize,
    /// Earlier event
    pub past: EventId,
    /// Later event
    pub future: EventId,
    /// Whether either end asked for a dashed link
    pub dash: bool,
}

/// Walk consecutive pairs of a sequence
pub fn sequence_links(entries: &[SequenceEntry]) -> impl Iterator<Item = SequenceLink> + '_ {
    entries
        .windows(2)
        .enumerate()
        .map(|(i, pair)| SequenceLink {
            index: i + 1,
            past: pair[0].event,
            future: pair[1].event,
            dash: pair[0].dash_to_next || pair[1].dash_from_previous,
        })
}

/// Join display names with `", "`
pub fn join_names<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().collect::<Vec<_>>().join(", ")
}
