//! Lineage: Genealogical Graph Engine
//!
//! Maintains a family graph (persons, spousal unions, parent-child links)
//! built incrementally from name-addressed entries arriving in any order,
//! and derives a layered, renderer-agnostic diagram description from it:
//! couples join at a shared union anchor and children hang from that anchor
//! with an optional label on the connecting edge.
//!
//! # Core Concepts
//!
//! - **Persons**: stable identities resolved from free-text names
//! - **Unions**: at most one per unordered spouse pair, keyed by the pair
//! - **Parent links**: one or two parents per child, with an edge label
//! - **Diagram**: the derived node/edge list handed to a rendering backend
//!
//! # Example
//!
//! ```
//! use lineage::LineageApi;
//!
//! let api = LineageApi::new();
//! api.link_spouses("Alice", "Bob").unwrap();
//! api.link_parents(&["Alice", "Bob"], "Carol", Some("Daughter")).unwrap();
//!
//! let diagram = api.project();
//! assert_eq!(diagram.nodes.len(), 4); // three persons plus one union anchor
//! ```

mod api;
mod graph;
pub mod layout;
pub mod storage;

pub use api::{Applied, Entry, InboundEvent, LineageApi};
pub use graph::{
    FamilyGraph, LineageError, LineageResult, ParentLink, ParentSet, Person, PersonId,
    PersonMetadata, SpousalUnion, UnionId,
};
pub use layout::{project, Diagram, DiagramEdge, DiagramNode, DotOptions, EdgeStyle, NodeKind};
pub use storage::{
    FlatRow, LineageStore, OpenStore, RowKind, SqliteStore, StorageError, StorageResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
