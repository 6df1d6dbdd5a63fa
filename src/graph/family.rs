//! FamilyGraph: the aggregate owning persons, unions, and parent links

use super::person::{Person, PersonId};
use super::resolve::normalize;
use super::union::{ParentLink, ParentSet, SpousalUnion, UnionId};
use crate::storage::StorageError;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use thiserror::Error;

/// Errors surfaced by graph mutations and the API boundary
#[derive(Debug, Error)]
pub enum LineageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid relationship: {0}")]
    InvalidRelationship(String),

    #[error("inconsistent graph: {0}")]
    InconsistentGraph(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for graph and API operations
pub type LineageResult<T> = Result<T, LineageError>;

/// The relationship graph: persons, spousal unions, parent links
///
/// Single-writer, in-memory state. Every mutation validates before it
/// writes, so a rejected operation leaves the graph unchanged. The
/// normalized-name index is the resolver's bijection from normalized
/// display name to person id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyGraph {
    pub(crate) persons: HashMap<PersonId, Person>,
    pub(crate) unions: HashMap<UnionId, SpousalUnion>,
    /// Parent links keyed by child: a child has at most one recorded parent set
    pub(crate) links: HashMap<PersonId, ParentLink>,
    pub(crate) name_index: HashMap<String, PersonId>,
}

impl FamilyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // === Mutations ===

    /// Create or resolve a person by name, updating the note if provided
    ///
    /// The note is last-write-wins when the person already exists.
    pub fn add_person(&mut self, name: &str, note: Option<&str>) -> LineageResult<PersonId> {
        let id = self.resolve(name)?;
        if let Some(note) = note {
            if let Some(person) = self.persons.get_mut(&id) {
                person.note = Some(note.to_string());
                person.touch();
            }
        }
        Ok(id)
    }

    /// Link two persons as spouses, creating either on first mention
    ///
    /// Idempotent: an existing union for the unordered pair is returned
    /// unchanged. Self-pairing is rejected.
    pub fn link_spouses(&mut self, a: &str, b: &str) -> LineageResult<UnionId> {
        // Validate both names before resolving either, so a rejected call
        // creates no person.
        let key_a = Self::require_name(a)?;
        let key_b = Self::require_name(b)?;
        if key_a == key_b {
            return Err(LineageError::InvalidRelationship(format!(
                "'{}' cannot be their own spouse",
                a.trim()
            )));
        }

        let id_a = self.resolve(a)?;
        let id_b = self.resolve(b)?;
        Ok(self.ensure_union(id_a, id_b))
    }

    /// Record the parent(s) of a child, with an optional edge label
    ///
    /// Accepts one or two parent names. The two-parent form creates the
    /// spousal union for the pair if it is not yet recorded. Re-linking the
    /// same child merges: the same parent set updates the label (last write
    /// wins); a different parent set replaces the previous record. The edge
    /// is never duplicated.
    pub fn link_parents(
        &mut self,
        parents: &[&str],
        child: &str,
        label: Option<&str>,
    ) -> LineageResult<()> {
        if parents.is_empty() || parents.len() > 2 {
            return Err(LineageError::InvalidInput(format!(
                "expected one or two parents, got {}",
                parents.len()
            )));
        }
        let child_key = Self::require_name(child)?;
        let parent_keys: Vec<String> = parents
            .iter()
            .map(|p| Self::require_name(p))
            .collect::<LineageResult<_>>()?;
        if parent_keys.len() == 2 && parent_keys[0] == parent_keys[1] {
            return Err(LineageError::InvalidRelationship(format!(
                "both parents resolve to the same person '{}'",
                parents[0].trim()
            )));
        }
        if parent_keys.contains(&child_key) {
            return Err(LineageError::InvalidRelationship(format!(
                "'{}' cannot be their own parent",
                child.trim()
            )));
        }

        let child_id = self.resolve(child)?;
        let parent_ids: Vec<PersonId> = parents
            .iter()
            .map(|p| self.resolve(p))
            .collect::<LineageResult<_>>()?;

        let set = match parent_ids.as_slice() {
            [p] => ParentSet::single(*p),
            [a, b] => {
                self.ensure_union(*a, *b);
                ParentSet::couple(*a, *b)
            }
            _ => unreachable!("length validated above"),
        };

        let label = label.map(|l| l.to_string());
        match self.links.entry(child_id) {
            Entry::Occupied(mut entry) => {
                let link = entry.get_mut();
                if link.parents == set {
                    link.label = label;
                } else {
                    *link = ParentLink::new(child_id, set, label);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(ParentLink::new(child_id, set, label));
            }
        }
        Ok(())
    }

    /// Change a person's display name
    ///
    /// Identity and existing links are untouched. Renaming onto another
    /// person's normalized name is rejected: names are the only handle the
    /// inbound interface has, so the normalized mapping must stay bijective.
    pub fn rename(&mut self, id: PersonId, new_name: &str) -> LineageResult<()> {
        let new_key = Self::require_name(new_name)?;
        let person = self
            .persons
            .get_mut(&id)
            .ok_or_else(|| LineageError::NotFound(format!("no person with id {}", id)))?;
        if let Some(&holder) = self.name_index.get(&new_key) {
            if holder != id {
                return Err(LineageError::InvalidInput(format!(
                    "name '{}' is already in use",
                    new_name.trim()
                )));
            }
        }

        let old_key = normalize(&person.name);
        person.name = new_name.trim().to_string();
        person.touch();
        self.name_index.remove(&old_key);
        self.name_index.insert(new_key, id);
        Ok(())
    }

    /// Delete a person, cascading relationship cleanup
    ///
    /// Removes every union containing the person, the person's own parent
    /// link, and demotes any couple parent set they belonged to down to the
    /// remaining parent. Deleting an unknown id is an error.
    pub fn delete(&mut self, id: PersonId) -> LineageResult<()> {
        let person = self
            .persons
            .remove(&id)
            .ok_or_else(|| LineageError::NotFound(format!("no person with id {}", id)))?;
        self.name_index.remove(&normalize(&person.name));

        self.unions.retain(|_, union| !union.contains(id));

        // The person's own record as a child.
        self.links.remove(&id);

        // Their appearances as a parent: demote couples, drop singles.
        let mut orphaned = Vec::new();
        for (child, link) in self.links.iter_mut() {
            match link.parents {
                ParentSet::Single { parent } if parent == id => orphaned.push(*child),
                ParentSet::Couple { parents: (a, b) } if a == id => {
                    link.parents = ParentSet::single(b);
                }
                ParentSet::Couple { parents: (a, b) } if b == id => {
                    link.parents = ParentSet::single(a);
                }
                _ => {}
            }
        }
        for child in orphaned {
            self.links.remove(&child);
        }

        tracing::debug!(%id, name = %person.name, "deleted person and cascaded links");
        Ok(())
    }

    /// Reset to an empty graph
    pub fn clear(&mut self) {
        self.persons.clear();
        self.unions.clear();
        self.links.clear();
        self.name_index.clear();
    }

    // === Queries ===

    /// Get a person by id
    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(&id)
    }

    /// Find a person by name (case/whitespace-insensitive), without creating
    pub fn find_person(&self, name: &str) -> Option<&Person> {
        let key = normalize(name);
        self.name_index
            .get(&key)
            .and_then(|id| self.persons.get(id))
    }

    /// All persons, in no particular order
    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }

    /// The union for an unordered pair, if recorded
    pub fn union_for(&self, a: PersonId, b: PersonId) -> Option<&SpousalUnion> {
        self.unions.get(&UnionId::for_pair(a, b))
    }

    /// All unions
    pub fn unions(&self) -> impl Iterator<Item = &SpousalUnion> {
        self.unions.values()
    }

    /// The recorded parent link of a child, if any
    pub fn parent_link_of(&self, child: PersonId) -> Option<&ParentLink> {
        self.links.get(&child)
    }

    /// All parent links
    pub fn links(&self) -> impl Iterator<Item = &ParentLink> {
        self.links.values()
    }

    /// Children recorded under the given person (alone or as part of a couple)
    pub fn children_of(&self, id: PersonId) -> Vec<PersonId> {
        let mut children: Vec<PersonId> = self
            .links
            .values()
            .filter(|link| link.parents.contains(id))
            .map(|link| link.child)
            .collect();
        children.sort();
        children
    }

    /// Spouses of the given person, across all their unions
    pub fn spouses_of(&self, id: PersonId) -> Vec<PersonId> {
        let mut spouses: Vec<PersonId> = self
            .unions
            .values()
            .filter_map(|union| union.other(id))
            .collect();
        spouses.sort();
        spouses
    }

    /// Number of persons
    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    /// Number of unions
    pub fn union_count(&self) -> usize {
        self.unions.len()
    }

    /// Number of parent links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    // === Internal ===

    /// Get or create the union for a pair of already-resolved persons
    fn ensure_union(&mut self, a: PersonId, b: PersonId) -> UnionId {
        let id = UnionId::for_pair(a, b);
        self.unions
            .entry(id)
            .or_insert_with(|| SpousalUnion::new(a, b));
        id
    }

    /// Validate a name and return its normalized form
    fn require_name(name: &str) -> LineageResult<String> {
        let key = normalize(name);
        if key.is_empty() {
            return Err(LineageError::InvalidInput(
                "name must not be blank".to_string(),
            ));
        }
        Ok(key)
    }
}
