//! Diagram generation: the storyline and the friendship graph as DOT

pub mod dot;
pub mod friendship;
pub mod storyline;
pub mod tooltip;

pub use dot::{Attrs, DotGraph};
pub use friendship::friendship_graph;
pub use storyline::storyline_graph;

use std::fmt;
use std::str::FromStr;

/// Rank direction of the storyline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Left to right
    #[default]
    LeftRight,
    /// Top to bottom
    TopBottom,
    /// Bottom to top
    BottomTop,
    /// Right to left
    RightLeft,
}

impl Direction {
    /// Graphviz `rankdir` value
    #[must_use]
    pub const fn rankdir(self) -> &'static str {
        match self {
            Self::LeftRight => "LR",
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
            Self::RightLeft => "RL",
        }
    }

    /// Gradient angle making timebox fills run along the story
    #[must_use]
    pub const fn gradient_angle(self) -> &'static str {
        match self {
            Self::LeftRight => "0",
            Self::TopBottom => "270",
            Self::BottomTop => "90",
            Self::RightLeft => "180",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LR" => Ok(Self::LeftRight),
            "TB" => Ok(Self::TopBottom),
            "BT" => Ok(Self::BottomTop),
            "RL" => Ok(Self::RightLeft),
            _ => Err(format!(
                "Invalid direction: '{s}'. Valid options: LR, TB, BT, RL"
            )),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rankdir())
    }
}

/// Options shared by the diagram builders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagramOptions {
    /// Rank direction
    pub direction: Direction,
    /// Label fonts follow their line colour
    pub color_names: bool,
}

/// Wrap a message in a `javascript:alert(...)` URL so SVG viewers pop it up
///
/// Empty messages stay empty, so the attribute is left out.
#[must_use]
pub fn jsa(message: &str) -> String {
    if message.is_empty() {
        return String::new();
    }
    let escaped = message.replace('\n', "\\n").replace('\'', "\\'");
    format!("javascript:alert('{escaped}');")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!("lr".parse::<Direction>(), Ok(Direction::LeftRight));
        assert_eq!(" TB".parse::<Direction>(), Ok(Direction::TopBottom));
        assert!("up".parse::<Direction>().is_err());
        assert_eq!(Direction::BottomTop.to_string(), "BT");
    }

    #[test]
    fn test_gradient_angles() {
        assert_eq!(Direction::LeftRight.gradient_angle(), "0");
        assert_eq!(Direction::TopBottom.gradient_angle(), "270");
        assert_eq!(Direction::BottomTop.gradient_angle(), "90");
        assert_eq!(Direction::RightLeft.gradient_angle(), "180");
    }

    #[test]
    fn test_jsa_escapes() {
        assert_eq!(jsa(""), "");
        assert_eq!(
            jsa("Ann's\nparty"),
            "javascript:alert('Ann\\'s\\nparty');"
        );
    }
}
