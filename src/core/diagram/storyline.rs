//! The storyline: timelines as clusters of timeboxes, characters as edges

use super::dot::{Attrs, DotGraph};
use super::tooltip::{event_tooltip, line_tooltip};
use super::{jsa, DiagramOptions};
use crate::core::models::{BridgeId, EventId, LineId};
use crate::core::storyboard::Storyboard;

const DEFAULT_NODE_COLOR: &str = "#00000088";

/// Build the storyline graph of a finalized story
#[must_use]
pub fn storyline_graph(story: &Storyboard, options: &DiagramOptions) -> DotGraph {
    let mut graph = DotGraph::digraph(&story.name);
    graph
        .attrs
        .set("compound", "true")
        .set("rankdir", options.direction.rankdir())
        .set("tooltip", format!("{}\n{}", story.name, story.stats()));

    let alone = story.timelines().len() < 2;
    for timeline in story.timelines() {
        graph.add_subgraph(timeline_cluster(story, *timeline, alone, options));
    }
    for bridge in story.drawn_bridges() {
        let (tail, head, attrs) = bridge_edge(story, *bridge, options);
        graph.add_edge(&tail, &head, attrs);
    }
    graph
}

fn timeline_cluster(
    story: &Storyboard,
    id: LineId,
    alone: bool,
    options: &DiagramOptions,
) -> DotGraph {
    let line = story.line(id);
    let name = if alone {
        line.name.clone()
    } else {
        format!("cluster-{}", line.name)
    };
    let mut cluster = DotGraph::digraph(&name);
    cluster.attrs.set("compound", "true");
    cluster.attrs.set_opt("color", line.color.as_deref());
    if !alone {
        if options.color_names {
            cluster.attrs.set_opt("fontcolor", line.color.as_deref());
        }
        let tooltip = line_tooltip(story, id);
        cluster
            .attrs
            .set("label", line.name.as_str())
            .set("penwidth", "2")
            .set("fontname", "sans bold")
            .set("fontsize", "28")
            .set("URL", jsa(&tooltip))
            .set("tooltip", tooltip);
    }

    for anchor in line.events() {
        cluster.add_subgraph(timebox_cluster(story, anchor, options));
    }
    cluster
}

/// One cluster per anchor holding the happenings of every place at that time
fn timebox_cluster(story: &Storyboard, id: EventId, options: &DiagramOptions) -> DotGraph {
    let anchor = story.event(id);
    let base_color = story
        .line(anchor.line)
        .color
        .as_deref()
        .unwrap_or(DEFAULT_NODE_COLOR);
    let gradient = options.direction.gradient_angle();
    let tooltip = event_tooltip(story, id);

    let mut cluster = DotGraph::digraph(&anchor.cluster_name());
    cluster
        .attrs
        .set("label", anchor.timestamp.to_string())
        .set("gradientangle", gradient)
        .set("color", anchor.color.clone().unwrap_or_default())
        .set("URL", jsa(&tooltip))
        .set("tooltip", tooltip);

    let mut node = Attrs::new();
    if anchor.is_bookend() {
        cluster.attrs.set("style", "filled,rounded").set("penwidth", "0");
        node.set("gradientangle", gradient)
            .set("style", "filled")
            .set("penwidth", "0");
    }
    if anchor.opener {
        cluster.attrs.set("color", format!("{base_color}:#FFFFFF33"));
        node.set("shape", "egg")
            .set("color", format!("#EDEDED99:{base_color}"));
    } else if anchor.closer {
        cluster.attrs.set("color", format!("#FFFFFF33:{base_color}"));
        node.set("shape", "octagon")
            .set("color", format!("{base_color}:#EDEDED99"));
    } else {
        node.set("color", base_color);
    }

    for child in anchor.children() {
        let event = story.event(*child);
        let mut attrs = node.clone();
        if !anchor.is_bookend() {
            attrs.set_opt("color", event.color.as_deref());
        }
        let tooltip = event_tooltip(story, *child);
        attrs.set("URL", jsa(&tooltip)).set("tooltip", tooltip);
        cluster.add_node(&event.node_name(), attrs);
    }
    cluster.add_node(
        &anchor.node_name(),
        Attrs::new().with("shape", "point").with("style", "invis"),
    );
    cluster
}

fn bridge_edge(
    story: &Storyboard,
    id: BridgeId,
    options: &DiagramOptions,
) -> (String, String, Attrs) {
    let bridge = story.bridge(id);
    let past = story.event(bridge.past);
    let future = story.event(bridge.future);
    let color = story.connector_color(bridge.connector).unwrap_or_default();

    let mut attrs = Attrs::new();
    attrs
        .set_opt("style", bridge.style.style)
        .set_opt("fontname", bridge.style.font_name)
        .set_opt("arrowhead", bridge.style.arrow_head);
    if let Some(min_len) = bridge.style.min_len {
        attrs.set("minlen", min_len.to_string());
    }
    if bridge.style.style.is_none() && story.bridge_is_dashed(id) {
        attrs.set("style", "dashed");
    }
    let label = story.bridge_label(id);
    attrs
        .set("label", label.as_str())
        .set("color", color)
        .set("fontcolor", if options.color_names { color } else { "" });

    if bridge.style.clip_to_clusters {
        attrs
            .set("ltail", past.cluster_name())
            .set("lhead", future.cluster_name())
            .set("arrowhead", bridge.alternating_arrow_head());
    }

    if bridge.children.len() > 1 {
        let mut lines = vec![format!("{} -> {}: {label}", past.name, future.name)];
        lines.extend(bridge.children.iter().map(|child| story.bridge_label(*child)));
        let label_tooltip = lines.join("\n\t");
        attrs
            .set("URL", jsa(&label_tooltip))
            .set("labeltooltip", label_tooltip);
    }
    attrs.set("weight", story.bridge_weight(id).to_string());

    (past.node_name(), future.node_name(), attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagram::Direction;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn story(two_timelines: bool) -> Storyboard {
        let mut story = Storyboard::new("tale");
        story
            .create_timeline("Town", "T", &args(&["Square", "Pier"]), Some("navy".to_string()))
            .unwrap();
        if two_timelines {
            story.create_timeline("Dream", "", &[], None).unwrap();
        }
        story.create_event("Fair", "1", &args(&["Square"]), Some("pink".to_string())).unwrap();
        story.create_event("Storm", "2", &args(&["Pier"]), None).unwrap();
        story
            .create_character("Ann", "A", &args(&["fair-(", "storm"]), Some("red".to_string()))
            .unwrap();
        story.create_character("Bo", "B", &args(&["fair", "storm"]), None).unwrap();
        story
            .create_combiner("Pair", "P", &args(&["Ann", "Bo"]), Some("gold".to_string()), 5)
            .unwrap();
        story.finalize().unwrap();
        story
    }

    fn find_cluster<'a>(graph: &'a DotGraph, name: &str) -> &'a DotGraph {
        graph
            .subgraphs()
            .iter()
            .find(|g| g.name == name)
            .unwrap_or_else(|| panic!("no subgraph {name}"))
    }

    #[test]
    fn test_graph_attributes() {
        let story = story(false);
        let options = DiagramOptions {
            direction: Direction::TopBottom,
            color_names: false,
        };
        let graph = storyline_graph(&story, &options);

        assert_eq!(graph.name, "tale");
        assert_eq!(graph.attrs.get("compound"), Some("true"));
        assert_eq!(graph.attrs.get("rankdir"), Some("TB"));
        assert!(graph.attrs.get("tooltip").unwrap().starts_with("tale\n2 events"));

        // a lone timeline is not boxed
        let town = find_cluster(&graph, "Town");
        assert_eq!(town.attrs.get("label"), None);
        assert_eq!(town.subgraphs().len(), 4);
        assert_eq!(town.subgraphs()[1].attrs.get("gradientangle"), Some("270"));
    }

    #[test]
    fn test_several_timelines_are_clusters() {
        let story = story(true);
        let options = DiagramOptions {
            color_names: true,
            ..DiagramOptions::default()
        };
        let graph = storyline_graph(&story, &options);

        let town = find_cluster(&graph, "cluster-Town");
        assert_eq!(town.attrs.get("label"), Some("Town"));
        assert_eq!(town.attrs.get("fontcolor"), Some("navy"));
        assert_eq!(town.attrs.get("fontsize"), Some("28"));
        assert!(find_cluster(&graph, "cluster-Dream-tl").subgraphs().len() == 2);
    }

    #[test]
    fn test_timebox_nodes() {
        let story = story(false);
        let graph = storyline_graph(&story, &DiagramOptions::default());
        let town = find_cluster(&graph, "Town");

        let opener = &town.subgraphs()[0];
        assert_eq!(opener.attrs.get("style"), Some("filled,rounded"));
        assert_eq!(opener.attrs.get("color"), Some("navy:#FFFFFF33"));
        let (name, attrs) = opener.nodes().next().unwrap();
        assert_eq!(name, "Town start\nSquare");
        assert_eq!(attrs.get("shape"), Some("egg"));

        let fair = &town.subgraphs()[1];
        let colors: Vec<_> = fair
            .nodes()
            .map(|(name, attrs)| (name.to_string(), attrs.get("color").map(str::to_string)))
            .collect();
        assert_eq!(colors[0], ("Fair".to_string(), Some("pink".to_string())));
        let (_, point) = fair.nodes().last().unwrap();
        assert_eq!(point.get("style"), Some("invis"));
        assert_eq!(fair.nodes().count(), 2);

        let closer = &town.subgraphs()[3];
        assert_eq!(closer.nodes().next().unwrap().1.get("shape"), Some("octagon"));
    }

    #[test]
    fn test_edges() {
        let story = story(false);
        let graph = storyline_graph(&story, &DiagramOptions::default());
        let edges: Vec<_> = graph.edges().collect();

        let timeline_edge = edges
            .iter()
            .find(|(_, _, attrs)| attrs.get("weight") == Some("123"))
            .unwrap();
        assert_eq!(timeline_edge.2.get("style"), Some("bold"));
        assert_eq!(timeline_edge.2.get("arrowhead"), Some("lvee"));
        assert!(timeline_edge.2.get("ltail").unwrap().starts_with("cluster-"));

        let pair_edge = edges
            .iter()
            .find(|(_, _, attrs)| attrs.get("label") == Some("P-1"))
            .unwrap();
        assert_eq!(pair_edge.0, "Fair");
        assert_eq!(pair_edge.1, "Storm");
        assert_eq!(pair_edge.2.get("style"), Some("dashed"));
        assert_eq!(pair_edge.2.get("color"), Some("gold"));
        assert_eq!(pair_edge.2.get("weight"), Some("3"));
        assert_eq!(
            pair_edge.2.get("labeltooltip"),
            Some("Fair -> Storm: P-1\n\tA-1\n\tB-1")
        );
        assert!(pair_edge.2.get("URL").unwrap().starts_with("javascript:alert('"));

        let place_edge = edges
            .iter()
            .find(|(_, _, attrs)| attrs.get("weight") == Some("69"))
            .unwrap();
        assert_eq!(place_edge.2.get("label"), Some(""));
        assert_eq!(place_edge.2.get("arrowhead"), Some("onormal"));
    }
}
