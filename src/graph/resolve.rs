//! Name-based identity resolution
//!
//! The inbound interface addresses persons by free-text name. The resolver
//! turns a name into a stable `PersonId`, creating the person on first
//! mention and reusing the id afterwards. Matching is whitespace- and
//! case-insensitive; the display name keeps its entered casing.

use super::family::{FamilyGraph, LineageError, LineageResult};
use super::person::{Person, PersonId};

/// Normalize a name for identity comparison: trim, then Unicode-lowercase
pub(crate) fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl FamilyGraph {
    /// Resolve a name to a person id, creating the person on first mention
    ///
    /// Fails with `InvalidInput` when the name is blank after trimming.
    pub fn resolve(&mut self, name: &str) -> LineageResult<PersonId> {
        let key = normalize(name);
        if key.is_empty() {
            return Err(LineageError::InvalidInput(
                "name must not be blank".to_string(),
            ));
        }
        if let Some(&id) = self.name_index.get(&key) {
            return Ok(id);
        }

        let person = Person::new(name.trim());
        let id = person.id;
        self.persons.insert(id, person);
        self.name_index.insert(key, id);
        tracing::debug!(%id, name = name.trim(), "created person");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Alice  "), "alice");
        assert_eq!(normalize("BOB"), "bob");
        assert_eq!(normalize("Æsa"), "æsa");
    }

    // === Scenario: names differing only in case/whitespace share an id ===
    #[test]
    fn resolve_is_case_and_whitespace_insensitive() {
        let mut graph = FamilyGraph::new();
        let first = graph.resolve("Mary Ann").unwrap();
        assert_eq!(graph.resolve("  mary ann ").unwrap(), first);
        assert_eq!(graph.resolve("MARY ANN").unwrap(), first);
        assert_eq!(graph.person_count(), 1);
    }

    #[test]
    fn resolve_preserves_display_casing() {
        let mut graph = FamilyGraph::new();
        let id = graph.resolve("  McLeod ").unwrap();
        assert_eq!(graph.person(id).unwrap().name, "McLeod");
    }

    #[test]
    fn resolve_rejects_blank() {
        let mut graph = FamilyGraph::new();
        assert!(matches!(
            graph.resolve("   "),
            Err(LineageError::InvalidInput(_))
        ));
        assert_eq!(graph.person_count(), 0);
    }

    #[test]
    fn distinct_names_get_distinct_ids() {
        let mut graph = FamilyGraph::new();
        let a = graph.resolve("Alice").unwrap();
        let b = graph.resolve("Bob").unwrap();
        assert_ne!(a, b);
        assert_eq!(graph.person_count(), 2);
    }
}
