//! Characters and the combiners that bundle their travel lines

use super::{BridgeId, CharacterId, EventId, SequenceEntry};
use std::collections::{BTreeSet, HashSet};

/// Someone (or something) moving between events
#[derive(Debug, Clone)]
pub struct Character {
    /// Display name (without the trailing `*`)
    pub name: String,
    /// Name used on edge labels
    pub short_name: String,
    /// Graphviz colour, if any
    pub color: Option<String>,
    /// Left out of the friendship graph (name ended with `*`)
    pub skip_in_friendship_graph: bool,
    /// Attended events in order
    pub sequence: Vec<SequenceEntry>,
    /// Bridges between consecutive events
    pub bridges: Vec<BridgeId>,
}

impl Character {
    /// Create a character from its raw name cell
    ///
    /// A trailing `*` marks the character as hidden from the friendship graph.
    #[must_use]
    pub fn new(raw_name: &str, short_name: &str, color: Option<String>) -> Self {
        let trimmed = raw_name.trim();
        let (name, skip) = trimmed
            .strip_suffix('*')
            .map_or((trimmed, false), |stripped| (stripped.trim_end(), true));
        let short_name = match short_name.trim() {
            "" => name.to_string(),
            short => short.to_string(),
        };
        Self {
            name: name.to_string(),
            short_name,
            color,
            skip_in_friendship_graph: skip,
            sequence: Vec::new(),
            bridges: Vec::new(),
        }
    }

    /// Attended events in order (repeats included)
    pub fn events(&self) -> impl Iterator<Item = EventId> + '_ {
        self.sequence.iter().map(|entry| entry.event)
    }

    /// Attended events without repeats, in first-visit order
    #[must_use]
    pub fn distinct_events(&self) -> Vec<EventId> {
        let mut seen = HashSet::new();
        self.events().filter(|event| seen.insert(*event)).collect()
    }

    /// Does this character attend the same event twice?
    #[must_use]
    pub fn has_loop(&self) -> bool {
        self.distinct_events().len() != self.sequence.len()
    }

    /// First attended event
    #[must_use]
    pub fn first_event(&self) -> Option<EventId> {
        self.sequence.first().map(|entry| entry.event)
    }

    /// Last attended event
    #[must_use]
    pub fn latest_event(&self) -> Option<EventId> {
        self.sequence.last().map(|entry| entry.event)
    }
}

/// Characters drawn as one line while they travel together
#[derive(Debug, Clone)]
pub struct Combiner {
    /// Display name
    pub name: String,
    /// Name used on edge labels
    pub short_name: String,
    /// Graphviz colour, if any
    pub color: Option<String>,
    /// Characters sharing the line
    pub members: BTreeSet<CharacterId>,
    /// Entry number in the input; later entries win ties
    pub priority: usize,
    /// Combined bridges
    pub bridges: Vec<BridgeId>,
}

impl Combiner {
    /// Create a combiner for a set of characters
    #[must_use]
    pub fn new(
        name: &str,
        short_name: &str,
        color: Option<String>,
        members: BTreeSet<CharacterId>,
        priority: usize,
    ) -> Self {
        let name = name.trim().to_string();
        let short_name = match short_name.trim() {
            "" => name.clone(),
            short => short.to_string(),
        };
        Self {
            name,
            short_name,
            color,
            members,
            priority,
            bridges: Vec::new(),
        }
    }

    /// The implicit single-member combiner every character owns
    #[must_use]
    pub fn solo(id: CharacterId, character: &Character) -> Self {
        Self {
            name: character.name.clone(),
            short_name: character.short_name.clone(),
            color: character.color.clone(),
            members: BTreeSet::from([id]),
            priority: 0,
            bridges: Vec::new(),
        }
    }

    /// Whether this combiner bundles more than one character
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.members.len() > 1
    }

    /// Ordering used when choosing a combiner: larger groups first, then priority
    #[must_use]
    pub fn size_key(&self) -> (usize, usize) {
        (self.members.len(), self.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_marks_friendship_skip() {
        let hidden = Character::new(" Ghost* ", "", None);
        assert_eq!(hidden.name, "Ghost");
        assert_eq!(hidden.short_name, "Ghost");
        assert!(hidden.skip_in_friendship_graph);

        let shown = Character::new("Alice", "A", Some("red".to_string()));
        assert!(!shown.skip_in_friendship_graph);
        assert_eq!(shown.short_name, "A");
    }

    #[test]
    fn test_loop_detection() {
        let mut character = Character::new("Alice", "", None);
        character.sequence = vec![
            SequenceEntry::new(EventId(1), false, false),
            SequenceEntry::new(EventId(2), false, false),
        ];
        assert!(!character.has_loop());
        assert_eq!(character.first_event(), Some(EventId(1)));
        assert_eq!(character.latest_event(), Some(EventId(2)));

        character
            .sequence
            .push(SequenceEntry::new(EventId(1), false, false));
        assert!(character.has_loop());
        assert_eq!(character.distinct_events(), vec![EventId(1), EventId(2)]);
    }

    #[test]
    fn test_combiner_size_key() {
        let alice = Character::new("Alice", "Al", Some("red".to_string()));
        let solo = Combiner::solo(CharacterId(0), &alice);
        assert_eq!(solo.short_name, "Al");
        assert_eq!(solo.color.as_deref(), Some("red"));
        assert!(!solo.is_group());

        let pair = Combiner::new(
            "Duo",
            "",
            None,
            BTreeSet::from([CharacterId(0), CharacterId(1)]),
            4,
        );
        assert!(pair.is_group());
        assert!(pair.size_key() > solo.size_key());
        assert_eq!(pair.short_name, "Duo");
    }
}
