//! Persistence for the family graph
//!
//! The durable format is a flattened edge list: one `Root` row per person,
//! one `Spouse` row per union, one `Child` row per recorded parent. Stores
//! implement the `LineageStore` trait over that row shape; the primary
//! implementation is `SqliteStore`.

mod rows;
mod sqlite;
mod traits;

pub use rows::{from_rows, to_rows};
pub use sqlite::SqliteStore;
pub use traits::{FlatRow, LineageStore, OpenStore, RowKind, StorageError, StorageResult};
