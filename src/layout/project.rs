//! Projection of the family graph into a diagram description

use super::diagram::{Diagram, DiagramEdge, DiagramNode, EdgeStyle, NodeKind};
use crate::graph::{FamilyGraph, ParentLink, ParentSet, Person, PersonId, SpousalUnion, UnionId};

/// Diagram node id for a person
pub fn person_node_id(id: PersonId) -> String {
    format!("person:{}", id)
}

/// Diagram node id for a union anchor
///
/// UnionIds are derived from the unordered spouse pair, so repeated
/// projections agree on anchor identifiers without consulting any
/// insertion-order state.
pub fn union_node_id(id: UnionId) -> String {
    format!("union:{}", id)
}

/// Project the graph into a diagram description
///
/// Pure function of the graph contents: two calls on the same graph yield
/// identical diagrams. Persons are emitted in creation order, unions and
/// links in canonical id order.
pub fn project(graph: &FamilyGraph) -> Diagram {
    let mut diagram = Diagram::default();

    // One node per person.
    let mut persons: Vec<&Person> = graph.persons().collect();
    persons.sort_by_key(|p| (p.metadata.created_at, p.id));
    for person in persons {
        diagram.nodes.push(DiagramNode {
            id: person_node_id(person.id),
            label: person.name.clone(),
            kind: NodeKind::Person,
            annotation: person.note.clone(),
        });
    }

    // One anchor per union, joined to both spouses without arrowheads.
    let mut unions: Vec<&SpousalUnion> = graph.unions().collect();
    unions.sort_by_key(|u| u.id);
    for union in unions {
        let anchor = union_node_id(union.id);
        diagram.nodes.push(DiagramNode {
            id: anchor.clone(),
            label: String::new(),
            kind: NodeKind::Union,
            annotation: None,
        });
        let (a, b) = union.partners();
        diagram.edges.push(connector(person_node_id(a), anchor.clone()));
        diagram.edges.push(connector(person_node_id(b), anchor));
    }

    // One descending edge per parent link.
    let mut links: Vec<&ParentLink> = graph.links().collect();
    links.sort_by_key(|l| l.child);
    for link in links {
        let child = person_node_id(link.child);
        match link.parents {
            ParentSet::Couple { parents: (a, b) } => match graph.union_for(a, b) {
                Some(union) => {
                    diagram
                        .edges
                        .push(descent(union_node_id(union.id), child, link.label.clone()));
                }
                None => {
                    // No recorded union for this pair: fall back to a direct
                    // edge from each parent rather than dropping the link.
                    tracing::warn!(
                        child = %link.child,
                        "couple link has no backing union; drawing direct parent edges"
                    );
                    diagram.edges.push(descent(
                        person_node_id(a),
                        child.clone(),
                        link.label.clone(),
                    ));
                    diagram
                        .edges
                        .push(descent(person_node_id(b), child, link.label.clone()));
                }
            },
            ParentSet::Single { parent } => {
                diagram
                    .edges
                    .push(descent(person_node_id(parent), child, link.label.clone()));
            }
        }
    }

    diagram
}

fn connector(from: String, to: String) -> DiagramEdge {
    DiagramEdge {
        from,
        to,
        directed: false,
        label: None,
        style: EdgeStyle::Visible,
    }
}

fn descent(from: String, to: String, label: Option<String>) -> DiagramEdge {
    DiagramEdge {
        from,
        to,
        directed: true,
        label,
        style: EdgeStyle::Visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Scenario: couple with one child hangs from a single anchor ===
    #[test]
    fn couple_child_attaches_to_union_anchor() {
        let mut graph = FamilyGraph::new();
        graph.link_spouses("Alice", "Bob").unwrap();
        graph
            .link_parents(&["Alice", "Bob"], "Carol", Some("Daughter"))
            .unwrap();

        let diagram = project(&graph);
        assert_eq!(diagram.nodes_of_kind(NodeKind::Person).count(), 3);
        assert_eq!(diagram.nodes_of_kind(NodeKind::Union).count(), 1);

        let alice = graph.find_person("Alice").unwrap().id;
        let bob = graph.find_person("Bob").unwrap().id;
        let carol = graph.find_person("Carol").unwrap().id;
        let anchor = union_node_id(graph.union_for(alice, bob).unwrap().id);

        // Undirected spouse connectors.
        let spouse_edges: Vec<_> = diagram
            .edges
            .iter()
            .filter(|e| !e.directed && e.to == anchor)
            .collect();
        assert_eq!(spouse_edges.len(), 2);
        assert!(diagram.has_edge(&person_node_id(alice), &anchor));
        assert!(diagram.has_edge(&person_node_id(bob), &anchor));

        // Labelled descent from the anchor.
        let down: Vec<_> = diagram.edges_from(&anchor).collect();
        assert_eq!(down.len(), 1);
        assert_eq!(down[0].to, person_node_id(carol));
        assert_eq!(down[0].label.as_deref(), Some("Daughter"));
    }

    // === Scenario: single parent connects directly, no anchor involved ===
    #[test]
    fn single_parent_child_is_direct_edge() {
        let mut graph = FamilyGraph::new();
        graph.link_parents(&["Carol"], "Dan", Some("Son")).unwrap();

        let diagram = project(&graph);
        assert_eq!(diagram.nodes_of_kind(NodeKind::Union).count(), 0);

        let carol = graph.find_person("Carol").unwrap().id;
        let dan = graph.find_person("Dan").unwrap().id;
        let carol_node = person_node_id(carol);
        let edges: Vec<_> = diagram.edges_from(&carol_node).collect();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to, person_node_id(dan));
        assert_eq!(edges[0].label.as_deref(), Some("Son"));
    }

    // === Scenario: two children of one couple share the anchor ===
    #[test]
    fn siblings_share_one_union_anchor() {
        let mut graph = FamilyGraph::new();
        graph.link_parents(&["Alice", "Bob"], "Eve", None).unwrap();
        graph.link_parents(&["Alice", "Bob"], "Frank", None).unwrap();

        let diagram = project(&graph);
        assert_eq!(diagram.nodes_of_kind(NodeKind::Union).count(), 1);

        let alice = graph.find_person("Alice").unwrap().id;
        let bob = graph.find_person("Bob").unwrap().id;
        let anchor = union_node_id(graph.union_for(alice, bob).unwrap().id);
        assert_eq!(diagram.edges_from(&anchor).count(), 2);
    }

    // === Scenario: remarriage projects two anchors, children on their own ===
    #[test]
    fn remarriage_children_attach_to_their_own_pair() {
        let mut graph = FamilyGraph::new();
        graph.link_parents(&["Alice", "Bob"], "Carol", None).unwrap();
        graph
            .link_parents(&["Alice", "Charles"], "Dan", None)
            .unwrap();

        let diagram = project(&graph);
        assert_eq!(diagram.nodes_of_kind(NodeKind::Union).count(), 2);

        let alice = graph.find_person("Alice").unwrap().id;
        let bob = graph.find_person("Bob").unwrap().id;
        let charles = graph.find_person("Charles").unwrap().id;
        let carol = graph.find_person("Carol").unwrap().id;
        let dan = graph.find_person("Dan").unwrap().id;

        let anchor_ab = union_node_id(graph.union_for(alice, bob).unwrap().id);
        let anchor_ac = union_node_id(graph.union_for(alice, charles).unwrap().id);
        assert!(diagram.has_edge(&anchor_ab, &person_node_id(carol)));
        assert!(diagram.has_edge(&anchor_ac, &person_node_id(dan)));
        assert!(!diagram.has_edge(&anchor_ab, &person_node_id(dan)));
    }

    // === Scenario: couple link without a union degrades to direct edges ===
    #[test]
    fn missing_union_degrades_to_direct_edges() {
        let mut graph = FamilyGraph::new();
        let alice = graph.resolve("Alice").unwrap();
        let bob = graph.resolve("Bob").unwrap();
        let carol = graph.resolve("Carol").unwrap();
        // Bypass link_parents to fabricate the inconsistency it would repair.
        graph.links.insert(
            carol,
            ParentLink::new(
                carol,
                ParentSet::couple(alice, bob),
                Some("Daughter".to_string()),
            ),
        );

        let diagram = project(&graph);
        assert_eq!(diagram.nodes_of_kind(NodeKind::Union).count(), 0);
        assert!(diagram.has_edge(&person_node_id(alice), &person_node_id(carol)));
        assert!(diagram.has_edge(&person_node_id(bob), &person_node_id(carol)));
    }

    #[test]
    fn note_is_carried_as_annotation() {
        let mut graph = FamilyGraph::new();
        graph.add_person("Alice", Some("b. 1950")).unwrap();

        let diagram = project(&graph);
        let node = diagram.node_by_label("Alice").unwrap();
        assert_eq!(node.annotation.as_deref(), Some("b. 1950"));
    }

    #[test]
    fn projection_is_deterministic() {
        let mut graph = FamilyGraph::new();
        graph.link_spouses("Alice", "Bob").unwrap();
        graph
            .link_parents(&["Alice", "Bob"], "Carol", Some("Daughter"))
            .unwrap();
        graph.link_parents(&["Carol"], "Dan", Some("Son")).unwrap();

        assert_eq!(project(&graph), project(&graph));
    }

    #[test]
    fn empty_graph_projects_empty_diagram() {
        let diagram = project(&FamilyGraph::new());
        assert!(diagram.nodes.is_empty());
        assert!(diagram.edges.is_empty());
    }
}
