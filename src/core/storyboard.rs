//! The story registry: builds lines, events, characters and combiners from
//! entries, then wires them together with bridges.
//!
//! A `Storyboard` is filled entry by entry (see [`crate::core::loader`]) and
//! then [finalized](Storyboard::finalize): start/finish markers are added to
//! every timeline, sequences are sorted, and the travel of every character is
//! turned into bridges, merged into combiner lines where characters travel
//! together.

use crate::core::error::StoryError;
use crate::core::models::{
    join_names, sequence_links, Bridge, BridgeId, BridgeStyle, Character, CharacterId, Combiner,
    CombinerId, Connector, Event, EventId, EventKind, Line, LineId, LineKind, SequenceEntry,
};
use crate::debug;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Flags shared by the event constructors
#[derive(Debug, Clone, Default)]
struct EventOptions {
    color: Option<String>,
    opener: bool,
    closer: bool,
    generated: bool,
    no_meet: bool,
}

impl EventOptions {
    fn opener() -> Self {
        Self {
            opener: true,
            ..Self::default()
        }
    }

    fn closer() -> Self {
        Self {
            closer: true,
            ..Self::default()
        }
    }
}

/// A whole story: every timeline, place, event, character and combiner
#[derive(Debug, Clone, Default)]
pub struct Storyboard {
    /// Story name, used for graph names and output files
    pub name: String,
    /// Colour given to timelines that have none
    pub color: Option<String>,
    lines: Vec<Line>,
    events: Vec<Event>,
    characters: Vec<Character>,
    combiners: Vec<Combiner>,
    bridges: Vec<Bridge>,
    timelines: Vec<LineId>,
    line_index: HashMap<String, LineId>,
    event_index: HashMap<String, EventId>,
    character_index: HashMap<String, CharacterId>,
    combiner_index: HashMap<BTreeSet<CharacterId>, CombinerId>,
    link_order: Vec<(EventId, EventId)>,
    pending_links: HashMap<(EventId, EventId), Vec<BridgeId>>,
    drawn: Vec<BridgeId>,
    finalized: bool,
}

impl Storyboard {
    /// Create an empty story
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            ..Self::default()
        }
    }

    // ----- entry creation -------------------------------------------------

    /// Add a timeline and its places
    ///
    /// Without places, the timeline is named `<name>-tl` and gets a single
    /// place called `<name>`.
    ///
    /// # Errors
    /// Returns an error if the name is blank or a name is already taken.
    pub fn create_timeline(
        &mut self,
        name: &str,
        short_name: &str,
        places: &[String],
        color: Option<String>,
    ) -> Result<LineId, StoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoryError::EmptyName { kind: "timeline" });
        }
        let places: Vec<&str> = places
            .iter()
            .map(|place| place.trim())
            .filter(|place| !place.is_empty())
            .collect();

        let timeline_name = if places.is_empty() {
            format!("{name}-tl")
        } else {
            name.to_string()
        };
        let timeline_color = color.clone().or_else(|| self.color.clone());
        let timeline = self.register_line(Line::new(
            &timeline_name,
            short_name,
            timeline_color,
            LineKind::Timeline { places: Vec::new() },
        ))?;
        self.timelines.push(timeline);

        if places.is_empty() {
            self.create_place(timeline, name, color)?;
        } else {
            for place in places {
                self.create_place(timeline, place, color.clone())?;
            }
        }
        debug!(
            "Timeline {} with {} place(s)",
            self.lines[timeline.index()].name,
            self.lines[timeline.index()].places().len()
        );
        Ok(timeline)
    }

    fn create_place(
        &mut self,
        timeline: LineId,
        name: &str,
        color: Option<String>,
    ) -> Result<LineId, StoryError> {
        let color = color.or_else(|| self.lines[timeline.index()].color.clone());
        let place = self.register_line(Line::new(name, "", color, LineKind::Place { timeline }))?;
        if let LineKind::Timeline { places } = &mut self.lines[timeline.index()].kind {
            places.push(place);
        }
        Ok(place)
    }

    fn register_line(&mut self, line: Line) -> Result<LineId, StoryError> {
        if self.line_index.contains_key(&line.key) {
            return Err(StoryError::DuplicateLine { name: line.name });
        }
        let short_key = line.short_name.to_lowercase();
        if self.line_index.contains_key(&short_key) {
            return Err(StoryError::DuplicateShortName {
                name: line.name,
                short_name: line.short_name,
            });
        }

        let id = LineId(self.lines.len());
        self.line_index.insert(line.key.clone(), id);
        if short_key != line.key {
            self.line_index.insert(short_key, id);
        }
        self.lines.push(line);
        Ok(id)
    }

    /// Add an event from an `Event` entry
    ///
    /// `args[0]` names the timeline or place; a non-empty `args[1]` keeps the
    /// event off the friendship graph. An event on a timeline becomes an
    /// anchor with one child event per place.
    ///
    /// # Errors
    /// Returns an error if the location is missing or unknown, the timestamp
    /// is not an integer, or the name or timestamp is already taken.
    pub fn create_event(
        &mut self,
        name: &str,
        timestamp: &str,
        args: &[String],
        color: Option<String>,
    ) -> Result<EventId, StoryError> {
        if name.trim().is_empty() {
            return Err(StoryError::EmptyName { kind: "event" });
        }
        let location = args
            .first()
            .map(|arg| arg.trim().to_lowercase())
            .filter(|arg| !arg.is_empty())
            .ok_or_else(|| StoryError::MissingLocation {
                name: name.trim().to_string(),
                timestamp: timestamp.trim().to_string(),
            })?;
        let line = *self
            .line_index
            .get(&location)
            .ok_or(StoryError::UnknownLine { name: location })?;
        let timestamp: i64 =
            timestamp
                .trim()
                .parse()
                .map_err(|_| StoryError::InvalidTimestamp {
                    event: name.trim().to_string(),
                    value: timestamp.to_string(),
                })?;
        let options = EventOptions {
            color,
            no_meet: args.get(1).is_some_and(|arg| !arg.trim().is_empty()),
            ..EventOptions::default()
        };

        if self.lines[line.index()].is_timeline() {
            self.create_anchor(name, line, timestamp, &options, true)
        } else {
            self.create_happening(name, line, timestamp, &options)
        }
    }

    fn create_anchor(
        &mut self,
        name: &str,
        timeline: LineId,
        timestamp: i64,
        options: &EventOptions,
        with_children: bool,
    ) -> Result<EventId, StoryError> {
        let mut anchor = Event::new(
            name,
            timeline,
            timestamp,
            EventKind::Anchor {
                children: Vec::new(),
            },
        );
        anchor.opener = options.opener;
        anchor.closer = options.closer;
        anchor.generated = options.generated;
        anchor.color = if anchor.is_bookend() {
            self.lines[timeline.index()].color.clone()
        } else {
            options.color.clone()
        };
        anchor.skip_in_friendship_graph = true;
        let id = self.add_to_line(anchor)?;

        if with_children {
            let child_options = EventOptions {
                color: self.events[id.index()].color.clone(),
                generated: true,
                ..options.clone()
            };
            let places = self.lines[timeline.index()].places().to_vec();
            for place in places {
                let child_name = format!(
                    "{}-{}",
                    self.events[id.index()].name,
                    self.lines[place.index()].name
                );
                self.create_happening(&child_name, place, timestamp, &child_options)?;
            }
        }
        Ok(id)
    }

    fn create_happening(
        &mut self,
        name: &str,
        place: LineId,
        timestamp: i64,
        options: &EventOptions,
    ) -> Result<EventId, StoryError> {
        let Some(timeline) = self.lines[place.index()].timeline() else {
            return Err(StoryError::UnknownLine {
                name: self.lines[place.index()].name.clone(),
            });
        };
        let anchor = match self.lines[timeline.index()].event_at(timestamp) {
            Some(anchor) => anchor,
            None => {
                let anchor_name = format!("{}-{timestamp}", self.lines[place.index()].short_name);
                let anchor_options = EventOptions {
                    color: None,
                    no_meet: false,
                    ..options.clone()
                };
                self.create_anchor(&anchor_name, timeline, timestamp, &anchor_options, false)?
            }
        };

        let mut event = Event::new(name, place, timestamp, EventKind::Happening { anchor });
        event.color = options.color.clone();
        event.opener = options.opener;
        event.closer = options.closer;
        event.generated = options.generated;
        event.skip_in_friendship_graph = options.no_meet || !event.can_attend();
        let id = self.add_to_line(event)?;

        if let EventKind::Anchor { children } = &mut self.events[anchor.index()].kind {
            children.push(id);
        }
        Ok(id)
    }

    fn add_to_line(&mut self, event: Event) -> Result<EventId, StoryError> {
        if event.name.is_empty() {
            return Err(StoryError::EmptyName { kind: "event" });
        }
        let line = &self.lines[event.line.index()];
        if line.timestamps.contains_key(&event.timestamp) {
            return Err(StoryError::TimestampTaken {
                line: line.name.clone(),
                timestamp: event.timestamp,
            });
        }
        let key = event.key();
        if self.event_index.contains_key(&key) {
            return Err(StoryError::DuplicateEvent { name: event.name });
        }

        let id = EventId(self.events.len());
        let line = &mut self.lines[event.line.index()];
        line.sequence.push(SequenceEntry::new(id, true, true));
        line.timestamps.insert(event.timestamp, id);
        self.event_index.insert(key, id);
        self.events.push(event);
        Ok(id)
    }

    /// Add a character (or object) and the events it attends
    ///
    /// Event references are matched case-insensitively; `-(` at the end dashes
    /// the link to the next event, `)-` at the start dashes the link from the
    /// previous one. Blank references are ignored.
    ///
    /// # Errors
    /// Returns an error if the name is taken, an event is unknown, or an event
    /// cannot be attended.
    pub fn create_character(
        &mut self,
        name: &str,
        short_name: &str,
        events: &[String],
        color: Option<String>,
    ) -> Result<CharacterId, StoryError> {
        let character = Character::new(name, short_name, color);
        if character.name.is_empty() {
            return Err(StoryError::EmptyName { kind: "character" });
        }
        if self.character_index.contains_key(&character.name) {
            return Err(StoryError::DuplicateCharacter {
                name: character.name,
            });
        }
        if character.short_name != character.name
            && self.character_index.contains_key(&character.short_name)
        {
            return Err(StoryError::DuplicateCharacter {
                name: character.short_name,
            });
        }

        let id = CharacterId(self.characters.len());
        self.character_index.insert(character.name.clone(), id);
        if character.short_name != character.name {
            self.character_index
                .insert(character.short_name.clone(), id);
        }
        let solo = Combiner::solo(id, &character);
        self.characters.push(character);
        self.register_combiner(solo)?;

        for reference in events {
            let reference = reference.trim().to_lowercase();
            if reference.is_empty() {
                continue;
            }
            let (key, dash_from_previous, dash_to_next) = parse_event_reference(&reference);
            let event = *self
                .event_index
                .get(key)
                .ok_or_else(|| StoryError::UnknownEvent {
                    character: self.characters[id.index()].name.clone(),
                    event: key.to_string(),
                })?;
            self.attend(id, event, dash_from_previous, dash_to_next)?;
        }

        let character = &self.characters[id.index()];
        if let (Some(first), Some(last)) = (character.first_event(), character.latest_event()) {
            let first_anchor = self.events[first.index()].anchor(first);
            let last_anchor = self.events[last.index()].anchor(last);
            self.events[first.index()].entrances.insert(id);
            self.events[first_anchor.index()].entrances.insert(id);
            self.events[last.index()].exits.insert(id);
            self.events[last_anchor.index()].exits.insert(id);
        }
        Ok(id)
    }

    fn attend(
        &mut self,
        character: CharacterId,
        event: EventId,
        dash_from_previous: bool,
        dash_to_next: bool,
    ) -> Result<(), StoryError> {
        if !self.events[event.index()].can_attend() {
            return Err(StoryError::UnattendableEvent {
                character: self.characters[character.index()].name.clone(),
                event: self.events[event.index()].name.clone(),
            });
        }
        self.characters[character.index()]
            .sequence
            .push(SequenceEntry::new(event, dash_from_previous, dash_to_next));
        self.events[event.index()].add_attendee(character);
        let anchor = self.events[event.index()].anchor(event);
        if anchor != event {
            self.events[anchor.index()].add_attendee(character);
        }
        Ok(())
    }

    /// Add a combiner for two or more characters
    ///
    /// # Errors
    /// Returns an error if fewer than two characters are named, a character is
    /// unknown, or a combiner with the same members exists.
    pub fn create_combiner(
        &mut self,
        name: &str,
        short_name: &str,
        members: &[String],
        color: Option<String>,
        priority: usize,
    ) -> Result<CombinerId, StoryError> {
        if name.trim().is_empty() {
            return Err(StoryError::EmptyName { kind: "combiner" });
        }
        let names: Vec<&str> = members
            .iter()
            .map(|member| member.trim())
            .filter(|member| !member.is_empty())
            .collect();
        if names.len() < 2 {
            return Err(StoryError::TooFewCombined {
                name: name.trim().to_string(),
            });
        }

        let mut ids = BTreeSet::new();
        for member in names {
            let id = self
                .character_index
                .get(member)
                .ok_or_else(|| StoryError::UnknownCharacter {
                    combiner: name.trim().to_string(),
                    name: member.to_string(),
                })?;
            ids.insert(*id);
        }
        self.register_combiner(Combiner::new(name, short_name, color, ids, priority))
    }

    fn register_combiner(&mut self, combiner: Combiner) -> Result<CombinerId, StoryError> {
        if self.combiner_index.contains_key(&combiner.members) {
            return Err(StoryError::DuplicateCombiner {
                members: self.character_names(&combiner.members),
            });
        }
        let id = CombinerId(self.combiners.len());
        self.combiner_index.insert(combiner.members.clone(), id);
        self.combiners.push(combiner);
        Ok(id)
    }

    // ----- finalization ---------------------------------------------------

    /// Add start/finish markers and build every bridge
    ///
    /// Calling it again on a finalized story does nothing.
    ///
    /// # Errors
    /// Returns an error if a start/finish marker collides with an existing
    /// event name, or a timeline's first or last timestamp leaves no room
    /// for one.
    pub fn finalize(&mut self) -> Result<(), StoryError> {
        if self.finalized {
            return Ok(());
        }

        for timeline in self.timelines.clone() {
            let line = &self.lines[timeline.index()];
            let (start_name, start, finish_name, finish) =
                match (line.first_timestamp(), line.last_timestamp()) {
                    (Some(first), Some(last)) => {
                        let out_of_range = |timestamp| StoryError::TimestampOutOfRange {
                            timeline: line.name.clone(),
                            timestamp,
                        };
                        (
                            format!("{} start", line.name),
                            first.checked_sub(1).ok_or_else(|| out_of_range(first))?,
                            format!("{} finish", line.name),
                            last.checked_add(1).ok_or_else(|| out_of_range(last))?,
                        )
                    }
                    _ => (
                        format!("empty-{}-start", line.name),
                        -1,
                        format!("empty-{}-finish", line.name),
                        1,
                    ),
                };
            self.create_anchor(&start_name, timeline, start, &EventOptions::opener(), true)?;
            self.create_anchor(&finish_name, timeline, finish, &EventOptions::closer(), true)?;
        }

        for index in 0..self.lines.len() {
            self.build_line_bridges(LineId(index));
        }
        for index in 0..self.characters.len() {
            self.build_character_bridges(CharacterId(index));
        }
        self.merge_travel_bridges();

        self.finalized = true;
        debug!(
            "Story {} finalized with {} drawn bridge(s)",
            self.name,
            self.drawn.len()
        );
        Ok(())
    }

    /// Whether [`finalize`](Self::finalize) has run
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn build_line_bridges(&mut self, id: LineId) {
        self.lines[id.index()].sort_events();
        let line = &self.lines[id.index()];
        let is_timeline = line.is_timeline();
        let links: Vec<_> = sequence_links(&line.sequence).collect();

        for link in links {
            let mut bridge = Bridge::new(
                Connector::Line(id),
                link.index,
                link.past,
                link.future,
                link.dash,
            );
            if is_timeline {
                bridge.style = BridgeStyle::timeline();
            } else {
                bridge.show_name = false;
                bridge.show_number = false;
                bridge.style = BridgeStyle::place();
            }
            let bridge = self.push_bridge(bridge);
            self.lines[id.index()].bridges.push(bridge);
            self.queue_link(bridge);
        }
    }

    fn build_character_bridges(&mut self, id: CharacterId) {
        let links: Vec<_> = sequence_links(&self.characters[id.index()].sequence).collect();
        for link in links {
            let bridge = self.push_bridge(Bridge::new(
                Connector::Character(id),
                link.index,
                link.past,
                link.future,
                link.dash,
            ));
            self.characters[id.index()].bridges.push(bridge);
            self.queue_link(bridge);
        }
    }

    fn push_bridge(&mut self, bridge: Bridge) -> BridgeId {
        let id = BridgeId(self.bridges.len());
        self.bridges.push(bridge);
        id
    }

    fn queue_link(&mut self, bridge: BridgeId) {
        let key = (self.bridges[bridge.index()].past, self.bridges[bridge.index()].future);
        let pending = self.pending_links.entry(key).or_default();
        if pending.is_empty() {
            self.link_order.push(key);
        }
        pending.push(bridge);
    }

    /// Replace character bridges with combiner bridges, link by link
    ///
    /// For each pair of events, the largest combiner (then the highest
    /// priority, then the last registered) whose members all travel that link
    /// takes their bridges as children, until every traveller is covered.
    fn merge_travel_bridges(&mut self) {
        for key in std::mem::take(&mut self.link_order) {
            let queued = self.pending_links.remove(&key).unwrap_or_default();
            let mut travellers = Vec::new();
            for bridge in queued {
                if matches!(self.bridges[bridge.index()].connector, Connector::Character(_)) {
                    travellers.push(bridge);
                } else {
                    self.drawn.push(bridge);
                }
            }

            while !travellers.is_empty() {
                let present: BTreeSet<CharacterId> = travellers
                    .iter()
                    .filter_map(|bridge| match self.bridges[bridge.index()].connector {
                        Connector::Character(character) => Some(character),
                        _ => None,
                    })
                    .collect();
                let Some(combiner) = self
                    .combiners
                    .iter()
                    .enumerate()
                    .filter(|(_, combiner)| combiner.members.is_subset(&present))
                    .max_by_key(|(_, combiner)| combiner.size_key())
                    .map(|(index, _)| CombinerId(index))
                else {
                    break;
                };

                let mut combined = Bridge::new(Connector::Combiner(combiner), 0, key.0, key.1, false);
                for member in &self.combiners[combiner.index()].members {
                    if let Some(position) = travellers.iter().position(|bridge| {
                        self.bridges[bridge.index()].connector == Connector::Character(*member)
                    }) {
                        combined.children.push(travellers.remove(position));
                    }
                }
                let combined = self.push_bridge(combined);
                self.combiners[combiner.index()].bridges.push(combined);
            }
        }

        for index in 0..self.combiners.len() {
            self.number_combined_bridges(CombinerId(index));
            self.drawn
                .extend(self.combiners[index].bridges.iter().copied());
        }
    }

    /// Single-character combiners keep the character's numbering; groups are
    /// numbered along the member with the most events.
    fn number_combined_bridges(&mut self, id: CombinerId) {
        let combiner = &self.combiners[id.index()];
        let numbering: Vec<(BridgeId, usize)> = if combiner.is_group() {
            let Some(guide) = combiner
                .members
                .iter()
                .copied()
                .max_by_key(|member| self.characters[member.index()].sequence.len())
            else {
                return;
            };
            let mut order: Vec<(usize, BridgeId)> = combiner
                .bridges
                .iter()
                .map(|bridge| (self.child_index(*bridge, guide), *bridge))
                .collect();
            order.sort_by_key(|(index, _)| *index);
            order
                .into_iter()
                .enumerate()
                .map(|(position, (_, bridge))| (bridge, position + 1))
                .collect()
        } else {
            combiner
                .bridges
                .iter()
                .map(|bridge| {
                    let index = self.bridges[bridge.index()]
                        .children
                        .first()
                        .map_or(0, |child| self.bridges[child.index()].index);
                    (*bridge, index)
                })
                .collect()
        };

        for (bridge, index) in numbering {
            self.bridges[bridge.index()].index = index;
        }
    }

    fn child_index(&self, bridge: BridgeId, character: CharacterId) -> usize {
        self.bridges[bridge.index()]
            .children
            .iter()
            .find(|child| self.bridges[child.index()].connector == Connector::Character(character))
            .map_or(0, |child| self.bridges[child.index()].index)
    }

    // ----- lookups --------------------------------------------------------

    /// All timelines and places, in creation order
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// A timeline or place
    #[must_use]
    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.index()]
    }

    /// Timelines in creation order
    #[must_use]
    pub fn timelines(&self) -> &[LineId] {
        &self.timelines
    }

    /// All events (anchors and happenings)
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// An event
    #[must_use]
    pub fn event(&self, id: EventId) -> &Event {
        &self.events[id.index()]
    }

    /// All characters, in creation order
    #[must_use]
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// A character
    #[must_use]
    pub fn character(&self, id: CharacterId) -> &Character {
        &self.characters[id.index()]
    }

    /// All combiners, including the implicit single-character ones
    #[must_use]
    pub fn combiners(&self) -> &[Combiner] {
        &self.combiners
    }

    /// A bridge
    #[must_use]
    pub fn bridge(&self, id: BridgeId) -> &Bridge {
        &self.bridges[id.index()]
    }

    /// Bridges to draw on the storyline, in drawing order (empty before finalizing)
    #[must_use]
    pub fn drawn_bridges(&self) -> &[BridgeId] {
        &self.drawn
    }

    /// Find a timeline or place by name or short name (case-insensitive)
    #[must_use]
    pub fn find_line(&self, name: &str) -> Option<LineId> {
        self.line_index.get(&name.trim().to_lowercase()).copied()
    }

    /// Find an event by name (case-insensitive)
    #[must_use]
    pub fn find_event(&self, name: &str) -> Option<EventId> {
        self.event_index.get(&name.trim().to_lowercase()).copied()
    }

    /// Find a character by name or short name
    #[must_use]
    pub fn find_character(&self, name: &str) -> Option<CharacterId> {
        self.character_index.get(name.trim()).copied()
    }

    // ----- derived views --------------------------------------------------

    /// Comma-separated character names
    #[must_use]
    pub fn character_names<'a, I>(&self, ids: I) -> String
    where
        I: IntoIterator<Item = &'a CharacterId>,
    {
        join_names(
            ids.into_iter()
                .map(|id| self.characters[id.index()].name.as_str()),
        )
    }

    /// Everyone who visited any event of a line
    #[must_use]
    pub fn line_roster(&self, id: LineId) -> BTreeSet<CharacterId> {
        self.lines[id.index()]
            .events()
            .flat_map(|event| self.events[event.index()].roster())
            .collect()
    }

    /// Characters met along the way (including itself only when it loops)
    #[must_use]
    pub fn character_roster(&self, id: CharacterId) -> BTreeSet<CharacterId> {
        let character = &self.characters[id.index()];
        let mut roster: BTreeSet<CharacterId> = character
            .events()
            .flat_map(|event| self.events[event.index()].roster())
            .collect();
        if !character.has_loop() {
            roster.remove(&id);
        }
        roster
    }

    /// Characters met at events that count for the friendship graph
    #[must_use]
    pub fn friendship_roster(&self, id: CharacterId) -> BTreeSet<CharacterId> {
        let character = &self.characters[id.index()];
        let mut roster: BTreeSet<CharacterId> = character
            .events()
            .map(|event| &self.events[event.index()])
            .filter(|event| !event.skip_in_friendship_graph)
            .flat_map(Event::roster)
            .filter(|other| !self.characters[other.index()].skip_in_friendship_graph)
            .collect();
        if !character.has_loop() {
            roster.remove(&id);
        }
        roster
    }

    /// How many times `id` meets `other`, and over how many distinct events
    ///
    /// Meeting yourself counts the extra visits to an event.
    #[must_use]
    pub fn count_meetings(&self, id: CharacterId, other: CharacterId) -> (usize, usize) {
        let offset = usize::from(id == other);
        self.characters[id.index()]
            .distinct_events()
            .into_iter()
            .map(|event| {
                self.events[event.index()]
                    .attendance(other)
                    .saturating_sub(offset)
            })
            .fold((0, 0), |(meetings, events), count| {
                (meetings + count, events + usize::from(count > 0))
            })
    }

    /// Events where `id` meets `other`, in first-visit order
    #[must_use]
    pub fn shared_events(&self, id: CharacterId, other: CharacterId) -> Vec<EventId> {
        let threshold = usize::from(id == other);
        self.characters[id.index()]
            .distinct_events()
            .into_iter()
            .filter(|event| self.events[event.index()].attendance(other) > threshold)
            .collect()
    }

    /// Short name shown on a connector's edge labels
    #[must_use]
    pub fn connector_short_name(&self, connector: Connector) -> &str {
        match connector {
            Connector::Line(id) => &self.lines[id.index()].short_name,
            Connector::Character(id) => &self.characters[id.index()].short_name,
            Connector::Combiner(id) => &self.combiners[id.index()].short_name,
        }
    }

    /// Colour of a connector
    #[must_use]
    pub fn connector_color(&self, connector: Connector) -> Option<&str> {
        match connector {
            Connector::Line(id) => self.lines[id.index()].color.as_deref(),
            Connector::Character(id) => self.characters[id.index()].color.as_deref(),
            Connector::Combiner(id) => self.combiners[id.index()].color.as_deref(),
        }
    }

    /// Label of a bridge in its connector's terms, e.g. `Al-2`
    #[must_use]
    pub fn bridge_label(&self, id: BridgeId) -> String {
        let bridge = &self.bridges[id.index()];
        bridge.label(self.connector_short_name(bridge.connector))
    }

    /// A combined bridge is dashed when any member's bridge is
    #[must_use]
    pub fn bridge_is_dashed(&self, id: BridgeId) -> bool {
        let bridge = &self.bridges[id.index()];
        if bridge.children.is_empty() {
            bridge.dash
        } else {
            bridge
                .children
                .iter()
                .any(|child| self.bridges[child.index()].dash)
        }
    }

    /// Layout weight: keeps timelines straightest, then places, then busy combined lines
    #[must_use]
    pub fn bridge_weight(&self, id: BridgeId) -> usize {
        let bridge = &self.bridges[id.index()];
        match bridge.connector {
            Connector::Line(line) if self.lines[line.index()].is_timeline() => 123,
            Connector::Line(_) => 69,
            Connector::Character(_) | Connector::Combiner(_) => {
                let weight = 10 * bridge.children.len() + 7;
                if self.bridge_is_dashed(id) {
                    (weight + 4) / 9
                } else {
                    weight
                }
            }
        }
    }

    /// Summary counts of the story
    #[must_use]
    pub fn stats(&self) -> StoryStats {
        StoryStats {
            events: self.events.iter().filter(|event| event.can_attend()).count(),
            timeboxes: self
                .events
                .iter()
                .filter(|event| !event.can_attend() && !event.is_bookend())
                .count(),
            characters: self.characters.len(),
            combined_groups: self
                .combiners
                .iter()
                .filter(|combiner| combiner.is_group())
                .count(),
            lines: self.lines.len(),
        }
    }
}

/// Split an event reference into its name and dash markers
fn parse_event_reference(reference: &str) -> (&str, bool, bool) {
    let (rest, dash_to_next) = reference
        .strip_suffix("-(")
        .map_or((reference, false), |rest| (rest, true));
    let (rest, dash_from_previous) = rest
        .strip_prefix(")-")
        .map_or((rest, false), |rest| (rest, true));
    (rest.trim(), dash_from_previous, dash_to_next)
}

/// Counts printed after loading a story
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryStats {
    /// Events characters may attend
    pub events: usize,
    /// Timeline anchors, start/finish markers excluded
    pub timeboxes: usize,
    /// Characters and objects
    pub characters: usize,
    /// Combiners with more than one member
    pub combined_groups: usize,
    /// Timelines and places
    pub lines: usize,
}

impl fmt::Display for StoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} events", self.events)?;
        writeln!(f, "\t(sorted into {} timeboxen)", self.timeboxes)?;
        writeln!(f, "{} characters", self.characters)?;
        writeln!(f, "\t({} combined groups)", self.combined_groups)?;
        write!(f, "{} timelines and places", self.lines)
    }
}
