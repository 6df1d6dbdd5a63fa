//! Layered diagram projection
//!
//! Projects the family graph into a renderer-agnostic node/edge description.
//! The graph stores ground truth; the diagram is a derived view, recomputed
//! in full on every render request.

mod diagram;
mod dot;
mod project;

pub use diagram::{Diagram, DiagramEdge, DiagramNode, EdgeStyle, NodeKind};
pub use dot::DotOptions;
pub use project::{person_node_id, project, union_node_id};
