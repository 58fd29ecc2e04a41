//! Retrieval corpus documents.
//!
//! The `embedding` column is never selected back into Rust; it is only
//! written and compared in SQL.

use distopia_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `documents` table, without its embedding.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub source: String,
    pub content: String,
    pub created_at: Timestamp,
}

/// A nearest-neighbour hit with its cosine distance to the query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentMatch {
    pub id: DbId,
    pub source: String,
    pub content: String,
    pub distance: f64,
}

/// DTO for adding a document to the corpus.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocument {
    #[serde(default = "default_source")]
    pub source: String,
    pub content: String,
}

fn default_source() -> String {
    "manual".to_string()
}
