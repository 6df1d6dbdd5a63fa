//! Codec between the in-memory graph and the flattened row format
//!
//! The in-memory model stays normalized; the on-disk shape stays a flat
//! edge list. `to_rows` and `from_rows` are the explicit boundary between
//! the two, and round-trip: `from_rows(to_rows(g))` reconstructs a graph
//! isomorphic to `g` modulo identifier renumbering.

use super::traits::{FlatRow, RowKind, StorageError, StorageResult};
use crate::graph::{normalize, FamilyGraph, LineageError, ParentLink, Person, SpousalUnion};

/// Flatten the graph into rows, in deterministic order
pub fn to_rows(graph: &FamilyGraph) -> Vec<FlatRow> {
    let mut rows = Vec::new();

    let mut persons: Vec<&Person> = graph.persons().collect();
    persons.sort_by_key(|p| (p.metadata.created_at, p.id));
    for person in persons {
        rows.push(FlatRow::root(person.name.clone(), person.note.clone()));
    }

    let mut unions: Vec<&SpousalUnion> = graph.unions().collect();
    unions.sort_by_key(|u| u.id);
    for union in unions {
        let (a, b) = union.partners();
        if let (Some(a), Some(b)) = (graph.person(a), graph.person(b)) {
            rows.push(FlatRow::spouse(a.name.clone(), b.name.clone()));
        }
    }

    let mut links: Vec<&ParentLink> = graph.links().collect();
    links.sort_by_key(|l| l.child);
    for link in links {
        if let Some(child) = graph.person(link.child) {
            for parent_id in link.parents.members() {
                if let Some(parent) = graph.person(parent_id) {
                    rows.push(FlatRow::child(
                        child.name.clone(),
                        parent.name.clone(),
                        link.label.clone(),
                    ));
                }
            }
        }
    }

    rows
}

/// Rebuild a graph from rows
///
/// Rows replay through the mutation API, so name references resolve the
/// same way live entry does: a Child row naming an unrecorded parent
/// creates that person. Malformed rows fail loudly with `Corrupt`.
pub fn from_rows(rows: &[FlatRow]) -> StorageResult<FamilyGraph> {
    let mut graph = FamilyGraph::new();

    for row in rows.iter().filter(|r| r.kind == RowKind::Root) {
        graph
            .add_person(&row.name, row.label.as_deref())
            .map_err(corrupt)?;
    }

    for row in rows.iter().filter(|r| r.kind == RowKind::Spouse) {
        let partner = row.related_to.as_deref().ok_or_else(|| {
            StorageError::Corrupt(format!("spouse row for '{}' has no partner", row.name))
        })?;
        graph.link_spouses(&row.name, partner).map_err(corrupt)?;
    }

    // One Child row per parent: group rows by child before linking.
    let mut grouped: Vec<(String, String, Vec<String>, Option<String>)> = Vec::new();
    for row in rows.iter().filter(|r| r.kind == RowKind::Child) {
        let parent = row.related_to.clone().ok_or_else(|| {
            StorageError::Corrupt(format!("child row for '{}' has no parent", row.name))
        })?;
        let key = normalize(&row.name);
        match grouped.iter().position(|(k, ..)| *k == key) {
            Some(i) => {
                let (_, _, parents, label) = &mut grouped[i];
                parents.push(parent);
                if row.label.is_some() {
                    *label = row.label.clone();
                }
            }
            None => grouped.push((key, row.name.clone(), vec![parent], row.label.clone())),
        }
    }
    for (_, child, parents, label) in grouped {
        if parents.len() > 2 {
            return Err(StorageError::Corrupt(format!(
                "child '{}' has {} parent rows",
                child,
                parents.len()
            )));
        }
        let parent_refs: Vec<&str> = parents.iter().map(String::as_str).collect();
        graph
            .link_parents(&parent_refs, &child, label.as_deref())
            .map_err(corrupt)?;
    }

    Ok(graph)
}

fn corrupt(err: LineageError) -> StorageError {
    StorageError::Corrupt(err.to_string())
}
