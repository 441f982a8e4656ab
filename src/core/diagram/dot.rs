//! Minimal DOT document builder
//!
//! Identifiers and values are always quoted; attributes with empty values
//! are left out so unset colours and fonts fall back to Graphviz defaults.

use std::fmt::{self, Write};

/// Ordered attribute list; setting a key again replaces its value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(Vec<(String, String)>);

impl Attrs {
    /// Empty attribute list
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Set an attribute, keeping its original position when replaced
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if let Some(entry) = self.0.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.0.push((key.to_string(), value));
        }
        self
    }

    /// Set an attribute only when a value is present
    pub fn set_opt(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.set(key, value);
        }
        self
    }

    /// Builder-style [`set`](Self::set)
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Value of an attribute
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove an attribute
    pub fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    /// Attributes that will actually be written
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn write_list(&self, out: &mut String) {
        let list: Vec<String> = self
            .iter()
            .map(|(k, v)| format!("{k}={}", quote(v)))
            .collect();
        if !list.is_empty() {
            let _ = write!(out, " [{}]", list.join(" "));
        }
    }
}

/// Quote a DOT identifier or value
#[must_use]
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    // a trailing backslash would escape the closing quote
    if value.ends_with('\\') && !value.ends_with("\\\\") {
        quoted.push('\\');
    }
    quoted.push('"');
    quoted
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Edge {
    tail: String,
    head: String,
    attrs: Attrs,
}

/// A graph or subgraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotGraph {
    /// Graph identifier
    pub name: String,
    /// `digraph` (true) or `graph`
    pub directed: bool,
    /// Merge parallel edges (`strict`)
    pub strict: bool,
    /// Graph-level attributes
    pub attrs: Attrs,
    subgraphs: Vec<DotGraph>,
    nodes: Vec<(String, Attrs)>,
    edges: Vec<Edge>,
}

impl DotGraph {
    /// Directed graph
    #[must_use]
    pub fn digraph(name: &str) -> Self {
        Self {
            name: name.to_string(),
            directed: true,
            strict: false,
            attrs: Attrs::new(),
            subgraphs: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Strict undirected graph
    #[must_use]
    pub fn strict_graph(name: &str) -> Self {
        Self {
            directed: false,
            strict: true,
            ..Self::digraph(name)
        }
    }

    /// Nest a subgraph (name it `cluster...` to get a box)
    pub fn add_subgraph(&mut self, subgraph: Self) {
        self.subgraphs.push(subgraph);
    }

    /// Declare a node
    pub fn add_node(&mut self, name: &str, attrs: Attrs) {
        self.nodes.push((name.to_string(), attrs));
    }

    /// Add an edge between two nodes
    pub fn add_edge(&mut self, tail: &str, head: &str, attrs: Attrs) {
        self.edges.push(Edge {
            tail: tail.to_string(),
            head: head.to_string(),
            attrs,
        });
    }

    /// Nested subgraphs
    #[must_use]
    pub fn subgraphs(&self) -> &[Self] {
        &self.subgraphs
    }

    /// Declared nodes with their attributes
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &Attrs)> {
        self.nodes.iter().map(|(name, attrs)| (name.as_str(), attrs))
    }

    /// Edges as (tail, head, attributes)
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &Attrs)> {
        self.edges
            .iter()
            .map(|edge| (edge.tail.as_str(), edge.head.as_str(), &edge.attrs))
    }

    /// Render the DOT source
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        if self.strict {
            out.push_str("strict ");
        }
        out.push_str(if self.directed { "digraph " } else { "graph " });
        out.push_str(&quote(&self.name));
        out.push_str(" {\n");
        self.write_body(&mut out, 1, if self.directed { "->" } else { "--" });
        out.push_str("}\n");
        out
    }

    fn write_body(&self, out: &mut String, depth: usize, edge_op: &str) {
        let indent = "\t".repeat(depth);
        for (key, value) in self.attrs.iter() {
            let _ = writeln!(out, "{indent}{key}={}", quote(value));
        }
        for subgraph in &self.subgraphs {
            let _ = writeln!(out, "{indent}subgraph {} {{", quote(&subgraph.name));
            subgraph.write_body(out, depth + 1, edge_op);
            let _ = writeln!(out, "{indent}}}");
        }
        for (name, attrs) in &self.nodes {
            out.push_str(&indent);
            out.push_str(&quote(name));
            attrs.write_list(out);
            out.push('\n');
        }
        for edge in &self.edges {
            let _ = write!(
                out,
                "{indent}{} {edge_op} {}",
                quote(&edge.tail),
                quote(&edge.head)
            );
            edge.attrs.write_list(out);
            out.push('\n');
        }
    }
}

impl fmt::Display for DotGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote("two\nlines"), "\"two\nlines\"");
        assert_eq!(quote("end\\"), "\"end\\\\\"");
    }

    #[test]
    fn test_attrs_replace_and_skip_empty() {
        let mut attrs = Attrs::new().with("color", "red").with("label", "");
        attrs.set("color", "blue").set_opt("shape", None);

        assert_eq!(attrs.get("color"), Some("blue"));
        assert_eq!(attrs.get("shape"), None);
        assert_eq!(attrs.iter().collect::<Vec<_>>(), vec![("color", "blue")]);

        attrs.remove("color");
        assert_eq!(attrs.iter().count(), 0);
    }

    #[test]
    fn test_digraph_output() {
        let mut graph = DotGraph::digraph("story");
        graph.attrs.set("compound", "true");
        let mut cluster = DotGraph::digraph("cluster-a");
        cluster.attrs.set("label", "1");
        cluster.add_node("A\nB", Attrs::new().with("shape", "egg"));
        graph.add_subgraph(cluster);
        graph.add_edge("A\nB", "C", Attrs::new().with("style", "dashed"));

        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph \"story\" {\n"));
        assert!(dot.contains("\tcompound=\"true\"\n"));
        assert!(dot.contains("\tsubgraph \"cluster-a\" {\n\t\tlabel=\"1\"\n"));
        assert!(dot.contains("\t\t\"A\nB\" [shape=\"egg\"]\n"));
        assert!(dot.contains("\t\"A\nB\" -> \"C\" [style=\"dashed\"]\n"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_strict_graph_output() {
        let mut graph = DotGraph::strict_graph("s~friendships");
        graph.add_node("Ann", Attrs::new());
        graph.add_edge("Ann", "Bo", Attrs::new());

        let dot = graph.to_string();
        assert!(dot.starts_with("strict graph \"s~friendships\" {\n"));
        assert!(dot.contains("\t\"Ann\"\n"));
        assert!(dot.contains("\t\"Ann\" -- \"Bo\"\n"));
    }
}
