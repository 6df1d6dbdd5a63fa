//! Renderer-agnostic diagram description

use serde::{Deserialize, Serialize};

/// What a diagram node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A person, drawn as a regular labelled node
    Person,
    /// A zero-size anchor joining a spousal pair; children hang from it
    Union,
}

/// Edge visibility hint for the rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    #[default]
    Visible,
    Invisible,
}

/// One node of the diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
    /// Stable identifier, unique within the diagram
    pub id: String,
    /// Display label (empty for union anchors)
    pub label: String,
    pub kind: NodeKind,
    /// Free-text annotation carried from the person's note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

/// One edge of the diagram
///
/// Undirected edges join spouses to their union anchor; directed edges run
/// from a parent (or union anchor) down to a child. The rendering backend
/// layers generations from the direction of the directed edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub from: String,
    pub to: String,
    pub directed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub style: EdgeStyle,
}

/// The full diagram description handed to a rendering backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

impl Diagram {
    /// Find a node by id
    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by label (person nodes only carry labels)
    pub fn node_by_label(&self, label: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.label == label)
    }

    /// Whether an edge between the two ids exists, in the given direction
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.iter().any(|e| e.from == from && e.to == to)
    }

    /// Nodes of the given kind
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &DiagramNode> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Outgoing directed edges of a node
    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a DiagramEdge> {
        self.edges.iter().filter(move |e| e.from == id && e.directed)
    }
}
