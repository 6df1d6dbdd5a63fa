//! Storage trait definitions

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Row discriminant of the flattened format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    /// A person record; the label column carries the free-text note
    Root,
    /// A union: `name` married to `related_to`
    Spouse,
    /// A parent edge: `name` is the child of `related_to`, labelled
    Child,
}

impl RowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Spouse => "spouse",
            Self::Child => "child",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "root" => Some(Self::Root),
            "spouse" => Some(Self::Spouse),
            "child" => Some(Self::Child),
            _ => None,
        }
    }
}

impl std::fmt::Display for RowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the durable edge-list format
///
/// Sufficient to reconstruct the whole graph: persons from `Root` rows,
/// unions from `Spouse` rows, parent links from `Child` rows (two rows for
/// a couple, one per parent, carrying the same label).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    pub kind: RowKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FlatRow {
    /// A person row
    pub fn root(name: impl Into<String>, note: Option<String>) -> Self {
        Self {
            kind: RowKind::Root,
            name: name.into(),
            related_to: None,
            label: note,
        }
    }

    /// A union row
    pub fn spouse(name: impl Into<String>, partner: impl Into<String>) -> Self {
        Self {
            kind: RowKind::Spouse,
            name: name.into(),
            related_to: Some(partner.into()),
            label: None,
        }
    }

    /// A parent-edge row
    pub fn child(
        name: impl Into<String>,
        parent: impl Into<String>,
        label: Option<String>,
    ) -> Self {
        Self {
            kind: RowKind::Child,
            name: name.into(),
            related_to: Some(parent.into()),
            label,
        }
    }
}

/// Trait for flattened-row storage backends
///
/// Implementations must be thread-safe (Send + Sync); the engine invokes
/// them only at load/save boundaries, never inside a mutation.
pub trait LineageStore: Send + Sync {
    /// Load all rows, in the order they were saved
    fn load_rows(&self) -> StorageResult<Vec<FlatRow>>;

    /// Replace the stored rows with the given set
    fn save_rows(&self, rows: &[FlatRow]) -> StorageResult<()>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: LineageStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
