//! Bridges: the drawn links between consecutive events

use super::{BridgeId, CharacterId, CombinerId, EventId, LineId};
use std::fmt::Write;

/// The sequence a bridge belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
    /// A timeline or place
    Line(LineId),
    /// A single character, before merging into combiners
    Character(CharacterId),
    /// A combiner (including the implicit single-character ones)
    Combiner(CombinerId),
}

/// Fixed display settings a bridge carries from its connector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeStyle {
    /// Graphviz edge style (`bold`, `dotted`, ...)
    pub style: Option<&'static str>,
    /// Label font
    pub font_name: Option<&'static str>,
    /// Minimum rank distance
    pub min_len: Option<u32>,
    /// Arrowhead shape
    pub arrow_head: Option<&'static str>,
    /// Clip the edge at the anchor clusters (timeline bridges)
    pub clip_to_clusters: bool,
}

impl BridgeStyle {
    /// Bold, italic-labelled edges between timeline anchors
    #[must_use]
    pub const fn timeline() -> Self {
        Self {
            style: Some("bold"),
            font_name: Some("sans italic"),
            min_len: Some(1),
            arrow_head: None,
            clip_to_clusters: true,
        }
    }

    /// Dotted edges between the events of a place
    #[must_use]
    pub const fn place() -> Self {
        Self {
            style: Some("dotted"),
            font_name: None,
            min_len: None,
            arrow_head: Some("onormal"),
            clip_to_clusters: false,
        }
    }
}

/// A link from one event to the next along a connector
#[derive(Debug, Clone)]
pub struct Bridge {
    /// Owning sequence
    pub connector: Connector,
    /// 1-based number shown on the label
    pub index: usize,
    /// Earlier event
    pub past: EventId,
    /// Later event
    pub future: EventId,
    /// Dashed link
    pub dash: bool,
    /// Put the connector short name on the label
    pub show_name: bool,
    /// Put the index on the label
    pub show_number: bool,
    /// Fixed display settings
    pub style: BridgeStyle,
    /// Character bridges merged into this combined bridge
    pub children: Vec<BridgeId>,
}

impl Bridge {
    /// Create a bridge with a labelled name and number and no fixed style
    #[must_use]
    pub fn new(connector: Connector, index: usize, past: EventId, future: EventId, dash: bool) -> Self {
        Self {
            connector,
            index,
            past,
            future,
            dash,
            show_name: true,
            show_number: true,
            style: BridgeStyle::default(),
            children: Vec::new(),
        }
    }

    /// Label text for a connector short name, e.g. `Al-3`
    #[must_use]
    pub fn label(&self, short_name: &str) -> String {
        let mut label = String::new();
        if self.show_name {
            label.push_str(short_name);
        }
        if self.show_number {
            let _ = write!(label, "-{}", self.index);
        }
        label
    }

    /// Arrowhead for clipped timeline bridges, alternating so parallel edges differ
    #[must_use]
    pub const fn alternating_arrow_head(&self) -> &'static str {
        if self.index % 2 == 1 {
            "lvee"
        } else {
            "rvee"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_switches() {
        let mut bridge = Bridge::new(Connector::Line(LineId(0)), 3, EventId(0), EventId(1), false);
        assert_eq!(bridge.label("Al"), "Al-3");
        bridge.show_number = false;
        assert_eq!(bridge.label("Al"), "Al");
        bridge.show_name = false;
        assert_eq!(bridge.label("Al"), "");
    }

    #[test]
    fn test_alternating_arrow_head() {
        let odd = Bridge::new(Connector::Line(LineId(0)), 1, EventId(0), EventId(1), false);
        let even = Bridge::new(Connector::Line(LineId(0)), 2, EventId(1), EventId(2), false);
        assert_eq!(odd.alternating_arrow_head(), "lvee");
        assert_eq!(even.alternating_arrow_head(), "rvee");
    }

    #[test]
    fn test_styles() {
        assert!(BridgeStyle::timeline().clip_to_clusters);
        assert_eq!(BridgeStyle::place().style, Some("dotted"));
        assert_eq!(BridgeStyle::default().style, None);
    }
}
