//! Repository for the `documents` retrieval corpus (pgvector).
//!
//! Because we use runtime queries (no compile-time sqlx macros), embeddings
//! are passed as text (e.g. `'[0.1,0.2,...]'`) and cast with `::vector`.

use distopia_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{CreateDocument, Document, DocumentMatch};

const COLUMNS: &str = "id, source, content, created_at";

pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert a document together with its embedding.
    pub async fn insert(
        pool: &PgPool,
        input: &CreateDocument,
        embedding: &[f32],
    ) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (source, content, embedding)
             VALUES ($1, $2, $3::vector)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(&input.source)
            .bind(&input.content)
            .bind(vector_literal(embedding))
            .fetch_one(pool)
            .await
    }

    /// The `k` documents closest to `embedding` by cosine distance.
    pub async fn nearest(
        pool: &PgPool,
        embedding: &[f32],
        k: i64,
    ) -> Result<Vec<DocumentMatch>, sqlx::Error> {
        sqlx::query_as::<_, DocumentMatch>(
            "SELECT id, source, content, (embedding <=> $1::vector) AS distance
             FROM documents
             ORDER BY embedding <=> $1::vector
             LIMIT $2",
        )
        .bind(vector_literal(embedding))
        .bind(k)
        .fetch_all(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents ORDER BY id");
        sqlx::query_as::<_, Document>(&query).fetch_all(pool).await
    }

    /// Delete by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Render an embedding as a pgvector text literal.
pub fn vector_literal(embedding: &[f32]) -> String {
    format!(
        "[{}]",
        embedding
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    )
}
