//! The friendship graph: who meets whom, and how often

use super::dot::{Attrs, DotGraph};
use super::jsa;
use crate::core::models::CharacterId;
use crate::core::storyboard::Storyboard;

const DEFAULT_COLOR: &str = "#111111";

/// Build the friendship graph of a finalized story
///
/// Characters whose name ended with `*` and events given a second argument
/// are left out. Each pair is drawn once; a character attending the same
/// event more than once gets a self-edge.
#[must_use]
pub fn friendship_graph(story: &Storyboard) -> DotGraph {
    let mut graph = DotGraph::strict_graph(&format!("{}~friendships", story.name));
    graph.attrs.set("fontname", "signature");

    for (index, character) in story.characters().iter().enumerate() {
        if character.skip_in_friendship_graph {
            continue;
        }
        let id = CharacterId(index);
        graph.add_node(&character.name, character_node(story, id));

        for other in story.friendship_roster(id) {
            if other < id {
                continue;
            }
            if let Some(attrs) = meeting_edge(story, id, other) {
                graph.add_edge(&character.name, &story.character(other).name, attrs);
            }
        }
    }
    graph
}

fn color_of(story: &Storyboard, id: CharacterId) -> &str {
    story.character(id).color.as_deref().unwrap_or(DEFAULT_COLOR)
}

fn character_node(story: &Storyboard, id: CharacterId) -> Attrs {
    let character = story.character(id);
    let roster = story.character_roster(id);

    let mut tooltip = format!("Meets {} others", roster.len());
    if character.has_loop() {
        tooltip.push_str(" (looper)");
    }
    let mut popup = if roster.is_empty() {
        format!("{} is lonely", character.name)
    } else {
        let met: Vec<String> = roster
            .iter()
            .map(|other| {
                format!(
                    "{}\t({} times)",
                    story.character(*other).name,
                    story.count_meetings(id, *other).0
                )
            })
            .collect();
        format!("{} meets\n➡{}", character.name, met.join("\n➡"))
    };
    popup.push_str(&format!(
        "\nover {} events",
        character.distinct_events().len()
    ));

    Attrs::new()
        .with("color", color_of(story, id))
        .with("tooltip", tooltip)
        .with("shape", "signature")
        .with("URL", jsa(&popup))
}

fn meeting_edge(story: &Storyboard, id: CharacterId, other: CharacterId) -> Option<Attrs> {
    let name = &story.character(id).name;
    let (meetings, events) = story.count_meetings(id, other);
    let color = color_of(story, id);

    let mut attrs = Attrs::new().with("penwidth", "2");
    let summary = if other == id {
        if meetings == 0 {
            return None;
        }
        attrs.set("color", color).set("dir", "forward");
        format!("{name}\n{meetings} self-encounters")
    } else {
        attrs.set("color", format!("{color}:{}", color_of(story, other)));
        format!(
            "{name}--{}\nMeet {meetings} times",
            story.character(other).name
        )
    };

    let shared: Vec<&str> = story
        .shared_events(id, other)
        .into_iter()
        .map(|event| story.event(event).name.as_str())
        .collect();
    attrs
        .set("tooltip", format!("{summary} over {events} events"))
        .set(
            "weight",
            if other == id {
                "0".to_string()
            } else {
                meetings.to_string()
            },
        )
        .set("labelfontname", "monospace")
        .set("labelfontsize", "8")
        .set("URL", jsa(&format!("{summary}:\n➡{}", shared.join("\n➡"))));
    Some(attrs)
}
