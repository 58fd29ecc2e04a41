//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` input DTOs for inserts and overwrites

pub mod conversation;
pub mod data;
pub mod document;
pub mod feedback;
pub mod lore;

use serde::Serialize;

/// Result of an upsert-by-name: whether the row was inserted or an existing
/// row had its description appended to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "row", rename_all = "lowercase")]
pub enum UpsertOutcome<T> {
    Created(T),
    Updated(T),
}

impl<T> UpsertOutcome<T> {
    pub fn from_inserted(inserted: bool, row: T) -> Self {
        if inserted {
            Self::Created(row)
        } else {
            Self::Updated(row)
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Created(row) | Self::Updated(row) => row,
        }
    }
}
