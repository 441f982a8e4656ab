//! Hover texts for lines and events

use crate::core::models::{CharacterId, EventId, LineId};
use crate::core::storyboard::Storyboard;
use std::collections::BTreeSet;

const ROSTER: &str = "\n📒Roster: ";
const SKIP_MARK: &str = "**";
const SKIP_NOTE: &str = "\n** = skipped when drawing lines on the friendship graph";

fn roster_text<'a>(
    story: &Storyboard,
    name: &str,
    roster: impl IntoIterator<Item = &'a CharacterId>,
) -> String {
    let names = story.character_names(roster);
    if names.is_empty() {
        String::new()
    } else {
        format!("{name}{ROSTER}{names}")
    }
}

/// Who visited a timeline or place; empty when nobody did
#[must_use]
pub fn line_tooltip(story: &Storyboard, id: LineId) -> String {
    let line = story.line(id);
    let text = roster_text(story, &line.name, &story.line_roster(id));
    if line.is_timeline() {
        text
    } else {
        text.replace(ROSTER, "\nVisitors: ")
    }
}

/// Who attended, entered, left or looped at an event
///
/// Start/finish happenings show their place instead.
#[must_use]
pub fn event_tooltip(story: &Storyboard, id: EventId) -> String {
    let event = story.event(id);
    if !event.is_anchor() && event.is_bookend() {
        return line_tooltip(story, event.line);
    }

    let roster: BTreeSet<_> = event.roster().collect();
    let mut text = roster_text(story, &event.name, &roster);
    if text.is_empty() {
        return text;
    }
    if event.skip_in_friendship_graph {
        text.push_str(SKIP_MARK);
    }
    if !event.generated {
        let located = format!("{} [{}]", event.name, story.line(event.line).name);
        text = text.replacen(&event.name, &located, 1);
    }
    if !event.entrances.is_empty() {
        text.push_str("\n🛬Entrances: ");
        text.push_str(&story.character_names(&event.entrances));
    }
    if !event.exits.is_empty() {
        text.push_str("\n🛫Departures: ");
        text.push_str(&story.character_names(&event.exits));
    }
    let loopers: Vec<_> = event.loopers().collect();
    if !loopers.is_empty() {
        text.push_str("\n➰Loopers: ");
        text.push_str(&story.character_names(&loopers));
    }
    if event.skip_in_friendship_graph {
        text.push_str(SKIP_NOTE);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story() -> Storyboard {
        let args = |v: &[&str]| v.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
        let mut story = Storyboard::new("t");
        story
            .create_timeline("Town", "T", &args(&["Square", "Pier"]), None)
            .unwrap();
        story.create_event("Fair", "1", &args(&["Square"]), None).unwrap();
        story.create_event("Storm", "2", &args(&["Pier", "x"]), None).unwrap();
        story
            .create_character("Ann", "", &args(&["fair", "storm", "storm"]), None)
            .unwrap();
        story.create_character("Bo", "", &args(&["fair"]), None).unwrap();
        story.finalize().unwrap();
        story
    }

    #[test]
    fn test_event_tooltip() {
        let story = story();
        let fair = story.find_event("fair").unwrap();
        assert_eq!(
            event_tooltip(&story, fair),
            "Fair [Square]\n📒Roster: Ann, Bo\n🛬Entrances: Ann, Bo\n🛫Departures: Bo"
        );
    }

    #[test]
    fn test_skipped_event_tooltip() {
        let story = story();
        let storm = story.find_event("storm").unwrap();
        let text = event_tooltip(&story, storm);
        assert!(text.starts_with("Storm [Pier]\n📒Roster: Ann**"));
        assert!(text.contains("\n➰Loopers: Ann"));
        assert!(text.ends_with(SKIP_NOTE));
    }

    #[test]
    fn test_line_tooltips() {
        let story = story();
        let square = story.find_line("square").unwrap();
        assert_eq!(line_tooltip(&story, square), "Square\nVisitors: Ann, Bo");
        let town = story.find_line("town").unwrap();
        assert_eq!(line_tooltip(&story, town), "Town\n📒Roster: Ann, Bo");
    }

    #[test]
    fn test_empty_and_bookend_tooltips() {
        let story = story();
        let start = story.find_event("Town start-Pier").unwrap();
        assert_eq!(event_tooltip(&story, start), "Pier\nVisitors: Ann");

        let anchor = story.find_event("Town start").unwrap();
        assert_eq!(event_tooltip(&story, anchor), "");
    }
}
