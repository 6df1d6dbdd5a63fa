//! Graphviz DOT rendering backend
//!
//! A thin adapter over the diagram description. The attribute defaults
//! reproduce the vertical family-tree drawing: top-to-bottom ranks, circular
//! person nodes, point-sized union anchors, arrowhead-free spouse connectors
//! weighted to keep couples adjacent.

use super::diagram::{Diagram, EdgeStyle, NodeKind};
use std::fmt::Write;

/// Drawing options for the DOT emitter
#[derive(Debug, Clone)]
pub struct DotOptions {
    pub graph_name: String,
    pub nodesep: f32,
    pub ranksep: f32,
    pub fontname: String,
    pub fontsize: u32,
    pub arrowsize: f32,
    /// Rank weight on spouse connectors; high values keep couples adjacent
    pub spouse_weight: u32,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            graph_name: "family".to_string(),
            nodesep: 0.50,
            ranksep: 1.0,
            fontname: "Helvetica".to_string(),
            fontsize: 10,
            arrowsize: 0.7,
            spouse_weight: 10,
        }
    }
}

impl Diagram {
    /// Render the diagram as Graphviz DOT text
    pub fn to_dot(&self, opts: &DotOptions) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph {} {{", escape(&opts.graph_name));
        let _ = writeln!(out, "  rankdir=TB;");
        let _ = writeln!(out, "  nodesep={:.2};", opts.nodesep);
        let _ = writeln!(out, "  ranksep={:.1};", opts.ranksep);
        let _ = writeln!(
            out,
            "  node [shape=circle, style=filled, color=white, fontname=\"{}\", fontsize={}];",
            escape(&opts.fontname),
            opts.fontsize
        );
        let _ = writeln!(out, "  edge [arrowsize={:.1}];", opts.arrowsize);

        for node in &self.nodes {
            match node.kind {
                NodeKind::Person => {
                    let label = match &node.annotation {
                        Some(note) => format!("{}\\n{}", escape(&node.label), escape(note)),
                        None => escape(&node.label),
                    };
                    let _ = writeln!(out, "  \"{}\" [label=\"{}\"];", escape(&node.id), label);
                }
                NodeKind::Union => {
                    let _ = writeln!(
                        out,
                        "  \"{}\" [label=\"\", shape=point, width=0.01];",
                        escape(&node.id)
                    );
                }
            }
        }

        for edge in &self.edges {
            let mut attrs: Vec<String> = Vec::new();
            if let Some(label) = &edge.label {
                attrs.push(format!("label=\"{}\"", escape(label)));
            }
            if !edge.directed {
                attrs.push("arrowhead=none".to_string());
                attrs.push(format!("weight={}", opts.spouse_weight));
            }
            if edge.style == EdgeStyle::Invisible {
                attrs.push("style=invis".to_string());
            }
            let _ = write!(out, "  \"{}\" -> \"{}\"", escape(&edge.from), escape(&edge.to));
            if attrs.is_empty() {
                let _ = writeln!(out, ";");
            } else {
                let _ = writeln!(out, " [{}];", attrs.join(", "));
            }
        }

        out.push_str("}\n");
        out
    }
}

/// Escape a string for use inside a double-quoted DOT value
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}
