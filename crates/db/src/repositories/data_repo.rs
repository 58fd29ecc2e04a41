//! Repository for the `dtp_data` table.

use distopia_core::types::DbId;
use sqlx::PgPool;

use super::append_on_conflict;
use crate::models::data::{DataEntry, UpdateDataEntry, UpsertedDataEntry};
use crate::models::UpsertOutcome;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Provides upsert, listing, substring search, overwrite, and delete for `dtp_data`.
pub struct DataRepo;

impl DataRepo {
    /// Insert a row, or append `description` to the existing row with the same name.
    ///
    /// One `INSERT ... ON CONFLICT` statement, so concurrent upserts of the
    /// same name cannot lose each other's appends.
    pub async fn upsert_append(
        pool: &PgPool,
        name: &str,
        description: &str,
    ) -> Result<UpsertOutcome<DataEntry>, sqlx::Error> {
        let query = format!(
            "INSERT INTO dtp_data (name, description)
             VALUES ($1, $2)
             ON CONFLICT (name) DO UPDATE SET
                description = {},
                updated_at = NOW()
             RETURNING {COLUMNS}, (xmax = 0) AS inserted",
            append_on_conflict("dtp_data", "description")
        );
        let row = sqlx::query_as::<_, UpsertedDataEntry>(&query)
            .bind(name)
            .bind(description)
            .fetch_one(pool)
            .await?;
        Ok(UpsertOutcome::from_inserted(row.inserted, row.entry))
    }

    /// Every row, ordered by id.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<DataEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dtp_data ORDER BY id");
        sqlx::query_as::<_, DataEntry>(&query).fetch_all(pool).await
    }

    /// Rows whose name contains `substring` literally (case-sensitive, no wildcards).
    pub async fn search(pool: &PgPool, substring: &str) -> Result<Vec<DataEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dtp_data WHERE strpos(name, $1) > 0 ORDER BY id"
        );
        sqlx::query_as::<_, DataEntry>(&query)
            .bind(substring)
            .fetch_all(pool)
            .await
    }

    /// Overwrite name and description.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDataEntry,
    ) -> Result<Option<DataEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE dtp_data SET name = $2, description = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DataEntry>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dtp_data WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
