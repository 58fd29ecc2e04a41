//! Generic `dtp_data` records.

use distopia_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `dtp_data` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DataEntry {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /add-data`. Neither field is validated; empty strings are stored as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDataEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// DTO for `PUT /update-data/{id}`: a full overwrite of both fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDataEntry {
    pub name: String,
    pub description: String,
}

/// Upsert result row: the entry plus whether it was freshly inserted.
#[derive(Debug, FromRow)]
pub(crate) struct UpsertedDataEntry {
    #[sqlx(flatten)]
    pub entry: DataEntry,
    pub inserted: bool,
}
