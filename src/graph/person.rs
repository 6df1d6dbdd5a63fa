//! Person representation in the family graph

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a person
///
/// Stable for the lifetime of the graph; never reused after deletion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PersonId(Uuid);

impl PersonId {
    /// Create a new random PersonId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a PersonId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Person metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonMetadata {
    /// When the person was first recorded
    pub created_at: Option<DateTime<Utc>>,
    /// When the person was last modified (rename, note update)
    pub modified_at: Option<DateTime<Utc>>,
}

/// A person in the family graph
///
/// The display name keeps the casing it was entered with; identity matching
/// is handled by the resolver, which compares normalized names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier
    pub id: PersonId,
    /// Display name (original casing)
    pub name: String,
    /// Free-text annotation (relation label, birth date, ...); opaque to the core
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Person metadata
    #[serde(default)]
    pub metadata: PersonMetadata,
}

impl Person {
    /// Create a new person with the given display name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PersonId::new(),
            name: name.into(),
            note: None,
            metadata: PersonMetadata {
                created_at: Some(Utc::now()),
                ..Default::default()
            },
        }
    }

    /// Set the note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Update the last modified timestamp
    pub(crate) fn touch(&mut self) {
        self.metadata.modified_at = Some(Utc::now());
    }
}
