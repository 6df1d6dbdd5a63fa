//! Spousal unions and parent-child links

use super::person::PersonId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for deriving union identifiers from spouse pairs
const UNION_NAMESPACE: Uuid = Uuid::from_u128(0x8c1f_4b6e_a3d2_4e0f_9b57_21c6_e8a4_7d30);

/// Unique identifier for a spousal union
///
/// Derived deterministically from the unordered spouse pair: the same two
/// persons always yield the same UnionId, in either argument order, across
/// repeated projections and across processes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UnionId(Uuid);

impl UnionId {
    /// Derive the UnionId for an unordered pair of persons
    pub fn for_pair(a: PersonId, b: PersonId) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(lo.as_uuid().as_bytes());
        bytes[16..].copy_from_slice(hi.as_uuid().as_bytes());
        Self(Uuid::new_v5(&UNION_NAMESPACE, &bytes))
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for UnionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A union between exactly two persons
///
/// The pair is unordered: {A,B} and {B,A} are the same union, and the graph
/// holds at most one union per pair. The partners are stored in canonical
/// (sorted) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpousalUnion {
    /// Unique identifier, derived from the pair
    pub id: UnionId,
    partners: (PersonId, PersonId),
    /// When the union was recorded
    pub created_at: Option<DateTime<Utc>>,
}

impl SpousalUnion {
    /// Create a union over an unordered pair
    ///
    /// Callers must reject self-pairing before construction.
    pub fn new(a: PersonId, b: PersonId) -> Self {
        let partners = if a <= b { (a, b) } else { (b, a) };
        Self {
            id: UnionId::for_pair(a, b),
            partners,
            created_at: Some(Utc::now()),
        }
    }

    /// The two partners, in canonical order
    pub fn partners(&self) -> (PersonId, PersonId) {
        self.partners
    }

    /// Whether the given person is one of the partners
    pub fn contains(&self, id: PersonId) -> bool {
        self.partners.0 == id || self.partners.1 == id
    }

    /// The other partner, if the given person is one of the pair
    pub fn other(&self, id: PersonId) -> Option<PersonId> {
        if self.partners.0 == id {
            Some(self.partners.1)
        } else if self.partners.1 == id {
            Some(self.partners.0)
        } else {
            None
        }
    }
}

/// The parent side of a parent-child link: one person, or a couple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParentSet {
    /// A single recorded parent
    Single { parent: PersonId },
    /// Both parents; stored in canonical (sorted) order
    Couple { parents: (PersonId, PersonId) },
}

impl ParentSet {
    /// Build a single-parent set
    pub fn single(parent: PersonId) -> Self {
        Self::Single { parent }
    }

    /// Build a couple set from an unordered pair
    ///
    /// Callers must reject a == b before construction.
    pub fn couple(a: PersonId, b: PersonId) -> Self {
        let parents = if a <= b { (a, b) } else { (b, a) };
        Self::Couple { parents }
    }

    /// Whether the given person is among the parents
    pub fn contains(&self, id: PersonId) -> bool {
        match self {
            Self::Single { parent } => *parent == id,
            Self::Couple { parents } => parents.0 == id || parents.1 == id,
        }
    }

    /// The parents as a slice-friendly vector (one or two ids)
    pub fn members(&self) -> Vec<PersonId> {
        match self {
            Self::Single { parent } => vec![*parent],
            Self::Couple { parents } => vec![parents.0, parents.1],
        }
    }
}

/// A directed relationship from a parent set to a single child
///
/// The optional label is rendered on the parent→child edge ("Son",
/// "Daughter", ...). A child carries at most one link; re-linking merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentLink {
    /// The child
    pub child: PersonId,
    /// The recorded parent(s)
    pub parents: ParentSet,
    /// Edge label, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ParentLink {
    /// Create a new parent link
    pub fn new(child: PersonId, parents: ParentSet, label: Option<String>) -> Self {
        Self {
            child,
            parents,
            label,
        }
    }
}
