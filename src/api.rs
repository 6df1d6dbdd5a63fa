//! Transport-independent API layer.
//!
//! `LineageApi` is the single entry point for all consumer-facing
//! operations. Transports (CLI, tests, an embedding application) call
//! `LineageApi` methods — they never reach into `FamilyGraph` directly.
//! Each call locks the graph for exactly one operation, which also covers
//! the genuinely-concurrent-caller case: no reader can observe a partially
//! applied mutation.

use crate::graph::{FamilyGraph, LineageError, LineageResult, PersonId, UnionId};
use crate::layout::{project, Diagram};
use crate::storage::{from_rows, to_rows, LineageStore};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Inbound mutation events, as delivered by a UI or other collaborator
///
/// All names are free-text; matching is case/whitespace-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum InboundEvent {
    AddPerson {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    LinkSpouses {
        a: String,
        b: String,
    },
    LinkParents {
        parents: Vec<String>,
        child: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    Rename {
        from: String,
        to: String,
    },
    Delete {
        name: String,
    },
    Clear,
}

/// Outcome of an applied event, reporting the identities it touched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Applied {
    Person { id: PersonId },
    Union { id: UnionId },
    Linked { child: PersonId },
    Renamed { id: PersonId },
    Deleted { id: PersonId },
    Cleared,
}

/// A composite entry: one person plus optional spouse and parent links
///
/// Mirrors a single submission of the entry form: the person is added
/// first, then the spouse link, then the parent link, as a sequence of
/// core mutations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    /// Label for the parents→child edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Entry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_spouse(mut self, spouse: impl Into<String>) -> Self {
        self.spouse = Some(spouse.into());
        self
    }

    pub fn with_parents(mut self, parents: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Single entry point for all consumer-facing operations
pub struct LineageApi {
    graph: Mutex<FamilyGraph>,
    store: Option<Arc<dyn LineageStore>>,
}

impl Default for LineageApi {
    fn default() -> Self {
        Self::new()
    }
}

impl LineageApi {
    /// Create an API over an empty graph with no persistence
    pub fn new() -> Self {
        Self {
            graph: Mutex::new(FamilyGraph::new()),
            store: None,
        }
    }

    /// Create an API wired to a persistence store
    pub fn with_store(store: Arc<dyn LineageStore>) -> Self {
        Self {
            graph: Mutex::new(FamilyGraph::new()),
            store: Some(store),
        }
    }

    // --- Mutations ---

    /// Add (or re-note) a person
    pub fn add_person(&self, name: &str, note: Option<&str>) -> LineageResult<PersonId> {
        self.graph.lock().unwrap().add_person(name, note)
    }

    /// Link two persons as spouses
    pub fn link_spouses(&self, a: &str, b: &str) -> LineageResult<UnionId> {
        self.graph.lock().unwrap().link_spouses(a, b)
    }

    /// Record the parent(s) of a child
    pub fn link_parents(
        &self,
        parents: &[&str],
        child: &str,
        label: Option<&str>,
    ) -> LineageResult<()> {
        self.graph.lock().unwrap().link_parents(parents, child, label)
    }

    /// Rename a person, addressed by current name
    pub fn rename(&self, from: &str, to: &str) -> LineageResult<PersonId> {
        let mut graph = self.graph.lock().unwrap();
        let id = graph
            .find_person(from)
            .map(|p| p.id)
            .ok_or_else(|| LineageError::NotFound(format!("no person named '{}'", from.trim())))?;
        graph.rename(id, to)?;
        Ok(id)
    }

    /// Delete a person, addressed by name, cascading relationship cleanup
    pub fn delete(&self, name: &str) -> LineageResult<PersonId> {
        let mut graph = self.graph.lock().unwrap();
        let id = graph
            .find_person(name)
            .map(|p| p.id)
            .ok_or_else(|| LineageError::NotFound(format!("no person named '{}'", name.trim())))?;
        graph.delete(id)?;
        Ok(id)
    }

    /// Reset to an empty graph
    pub fn clear(&self) {
        self.graph.lock().unwrap().clear();
    }

    /// Apply one composite entry: person, then spouse, then parents
    ///
    /// Validated up front so that a malformed entry is rejected before any
    /// of its constituent mutations runs.
    pub fn add_entry(&self, entry: &Entry) -> LineageResult<PersonId> {
        if entry.parents.len() > 2 {
            return Err(LineageError::InvalidInput(format!(
                "expected one or two parents, got {}",
                entry.parents.len()
            )));
        }
        let id = self.add_person(&entry.name, entry.note.as_deref())?;
        if let Some(spouse) = &entry.spouse {
            self.link_spouses(&entry.name, spouse)?;
        }
        if !entry.parents.is_empty() {
            let parents: Vec<&str> = entry.parents.iter().map(String::as_str).collect();
            self.link_parents(&parents, &entry.name, entry.label.as_deref())?;
        }
        Ok(id)
    }

    /// Apply an inbound event
    pub fn apply(&self, event: InboundEvent) -> LineageResult<Applied> {
        match event {
            InboundEvent::AddPerson { name, note } => {
                let id = self.add_person(&name, note.as_deref())?;
                Ok(Applied::Person { id })
            }
            InboundEvent::LinkSpouses { a, b } => {
                let id = self.link_spouses(&a, &b)?;
                Ok(Applied::Union { id })
            }
            InboundEvent::LinkParents {
                parents,
                child,
                label,
            } => {
                let parents: Vec<&str> = parents.iter().map(String::as_str).collect();
                self.link_parents(&parents, &child, label.as_deref())?;
                let mut graph = self.graph.lock().unwrap();
                let child_id = graph.resolve(&child)?;
                Ok(Applied::Linked { child: child_id })
            }
            InboundEvent::Rename { from, to } => {
                let id = self.rename(&from, &to)?;
                Ok(Applied::Renamed { id })
            }
            InboundEvent::Delete { name } => {
                let id = self.delete(&name)?;
                Ok(Applied::Deleted { id })
            }
            InboundEvent::Clear => {
                self.clear();
                Ok(Applied::Cleared)
            }
        }
    }

    // --- Reads ---

    /// Project the current graph into a diagram description
    pub fn project(&self) -> Diagram {
        project(&self.graph.lock().unwrap())
    }

    /// Clone the current graph state for inspection
    pub fn snapshot(&self) -> FamilyGraph {
        self.graph.lock().unwrap().clone()
    }

    // --- Persistence boundaries ---

    /// Load the graph from the configured store, replacing in-memory state
    pub fn load(&self) -> LineageResult<()> {
        let store = self.require_store()?;
        let rows = store.load_rows()?;
        let rebuilt = from_rows(&rows)?;
        *self.graph.lock().unwrap() = rebuilt;
        Ok(())
    }

    /// Save the graph to the configured store
    pub fn save(&self) -> LineageResult<()> {
        let store = self.require_store()?;
        let rows = to_rows(&self.graph.lock().unwrap());
        store.save_rows(&rows)?;
        Ok(())
    }

    fn require_store(&self) -> LineageResult<&Arc<dyn LineageStore>> {
        self.store.as_ref().ok_or_else(|| {
            LineageError::InvalidInput("no persistence store configured".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{OpenStore, SqliteStore};

    #[test]
    fn events_roundtrip_through_json() {
        let event = InboundEvent::LinkParents {
            parents: vec!["Alice".to_string(), "Bob".to_string()],
            child: "Carol".to_string(),
            label: Some("Daughter".to_string()),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["op"], "link_parents");
        let back: InboundEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn apply_dispatches_all_operations() {
        let api = LineageApi::new();
        api.apply(InboundEvent::AddPerson {
            name: "Alice".to_string(),
            note: None,
        })
        .unwrap();
        api.apply(InboundEvent::LinkSpouses {
            a: "Alice".to_string(),
            b: "Bob".to_string(),
        })
        .unwrap();
        api.apply(InboundEvent::LinkParents {
            parents: vec!["Alice".to_string(), "Bob".to_string()],
            child: "Carol".to_string(),
            label: Some("Daughter".to_string()),
        })
        .unwrap();
        api.apply(InboundEvent::Rename {
            from: "Carol".to_string(),
            to: "Caroline".to_string(),
        })
        .unwrap();

        let snapshot = api.snapshot();
        assert_eq!(snapshot.person_count(), 3);
        assert!(snapshot.find_person("Caroline").is_some());

        api.apply(InboundEvent::Delete {
            name: "Bob".to_string(),
        })
        .unwrap();
        assert_eq!(api.snapshot().union_count(), 0);

        api.apply(InboundEvent::Clear).unwrap();
        assert_eq!(api.snapshot().person_count(), 0);
    }

    #[test]
    fn rename_unknown_name_fails() {
        let api = LineageApi::new();
        let err = api.rename("Nobody", "Somebody").unwrap_err();
        assert!(matches!(err, LineageError::NotFound(_)));
    }

    #[test]
    fn add_entry_applies_person_spouse_and_parents() {
        let api = LineageApi::new();
        api.add_entry(&Entry::new("Alice")).unwrap();
        api.add_entry(&Entry::new("Bob").with_spouse("Alice")).unwrap();
        api.add_entry(
            &Entry::new("Carol")
                .with_parents(["Alice", "Bob"])
                .with_label("Daughter"),
        )
        .unwrap();

        let snapshot = api.snapshot();
        assert_eq!(snapshot.person_count(), 3);
        assert_eq!(snapshot.union_count(), 1);
        assert_eq!(snapshot.link_count(), 1);
    }

    #[test]
    fn add_entry_rejects_three_parents() {
        let api = LineageApi::new();
        let err = api
            .add_entry(&Entry::new("Kid").with_parents(["A", "B", "C"]))
            .unwrap_err();
        assert!(matches!(err, LineageError::InvalidInput(_)));
        assert_eq!(api.snapshot().person_count(), 0);
    }

    #[test]
    fn save_and_load_through_store() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let api = LineageApi::with_store(store.clone());
        api.link_spouses("Alice", "Bob").unwrap();
        api.link_parents(&["Alice", "Bob"], "Carol", Some("Daughter"))
            .unwrap();
        api.save().unwrap();

        let other = LineageApi::with_store(store);
        other.load().unwrap();
        let snapshot = other.snapshot();
        assert_eq!(snapshot.person_count(), 3);
        assert_eq!(snapshot.union_count(), 1);
    }

    #[test]
    fn persistence_without_store_fails() {
        let api = LineageApi::new();
        assert!(matches!(
            api.save(),
            Err(LineageError::InvalidInput(_))
        ));
    }
}
