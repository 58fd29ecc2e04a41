//! Handlers for the upload directory.
//!
//! Every client-supplied name goes through [`UploadDir`], which sanitizes it
//! before touching the filesystem.
//!
//! [`UploadDir`]: distopia_core::storage::UploadDir

use std::io::{Cursor, Read};

use axum::body::{Body, Bytes};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use distopia_core::error::CoreError;
use distopia_core::storage::{extension_of, StoredFile};
use distopia_core::types::DbId;
use distopia_db::models::document::CreateDocument;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use super::read_file_field;
use crate::chat::ingest_document;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// Extracted archive contents may be at most this many times the upload limit.
const MAX_EXPANSION_FACTOR: u64 = 4;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct UploadParams {
    /// Also add the file's text to the document corpus.
    #[serde(default)]
    pub ingest: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub data: StoredFile,
    /// Set when `?ingest=true` added the file to the corpus.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct ZipUploadResult {
    pub archive: StoredFile,
    pub extracted: Vec<StoredFile>,
    /// Entry names that sanitized to nothing.
    pub skipped: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ZipUploadResponse {
    pub message: String,
    pub data: ZipUploadResult,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /upload/
///
/// With `?ingest=true` the file must be UTF-8 text. A failed ingest removes
/// the stored file again.
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let (filename, data) = read_file_field(&mut multipart).await?;

    let text = if params.ingest {
        let text = std::str::from_utf8(&data).map_err(|_| {
            CoreError::Validation(format!(
                "'{filename}' is not UTF-8 text, so it cannot be ingested"
            ))
        })?;
        Some(text.to_string())
    } else {
        None
    };

    let stored = state.uploads.save(&filename, &data).await?;

    tracing::info!(
        user = %user.username,
        original = %filename,
        stored = %stored.filename,
        bytes = stored.size_bytes,
        "Uploaded file",
    );

    let document_id = match text {
        Some(content) => {
            let input = CreateDocument {
                source: stored.filename.clone(),
                content,
            };
            match ingest_document(&state, &input).await {
                Ok(document) => Some(document.id),
                Err(e) => {
                    discard_upload(&state, &stored.filename).await;
                    return Err(e);
                }
            }
        }
        None => None,
    };

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: format!("File '{}' uploaded", stored.filename),
            data: stored,
            document_id,
        }),
    ))
}

/// POST /upload-zip/
///
/// Reads the whole archive first, so a corrupt or oversized one stores
/// nothing. Then saves the archive and each file entry through the same
/// sanitize-and-deduplicate path as `/upload/`.
pub async fn upload_zip(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ZipUploadResponse>)> {
    let (filename, data) = read_file_field(&mut multipart).await?;

    if extension_of(&filename).as_deref() != Some("zip") {
        return Err(AppError::BadRequest("Only .zip files can be uploaded here".into()));
    }

    let limit = state.config.max_upload_bytes as u64 * MAX_EXPANSION_FACTOR;
    let archive_bytes = data.clone();
    let entries = tokio::task::spawn_blocking(move || read_zip_entries(archive_bytes, limit))
        .await
        .map_err(|e| AppError::InternalError(format!("ZIP extraction task failed: {e}")))??;

    let archive = state.uploads.save(&filename, &data).await?;

    let mut extracted = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();
    for (name, bytes) in entries {
        match state.uploads.save(&name, &bytes).await {
            Ok(stored) => extracted.push(stored),
            Err(CoreError::Validation(_)) => {
                tracing::warn!(entry = %name, "Skipping ZIP entry with unusable name");
                skipped.push(name);
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(
        user = %user.username,
        archive = %archive.filename,
        extracted = extracted.len(),
        skipped = skipped.len(),
        "Uploaded ZIP archive",
    );

    Ok((
        StatusCode::CREATED,
        Json(ZipUploadResponse {
            message: format!(
                "ZIP '{}' uploaded, {} files extracted",
                archive.filename,
                extracted.len()
            ),
            data: ZipUploadResult {
                archive,
                extracted,
                skipped,
            },
        }),
    ))
}

/// GET /uploaded-files/
pub async fn list(
    State(state): State<AppState>,
    _caller: MaybeAuthUser,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let names = state.uploads.list().await?;
    Ok(Json(DataResponse { data: names }))
}

/// GET /download/{filename} and GET /download-file/{filename}/
///
/// Streams the stored bytes back as an attachment.
pub async fn download(
    State(state): State<AppState>,
    _caller: MaybeAuthUser,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let (name, file, size) = state.uploads.open(&filename).await?;
    let stream = ReaderStream::new(file);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{name}\""),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::InternalError(format!("Failed to build download response: {e}")))
}

/// DELETE /delete-file/{filename}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(filename): Path<String>,
) -> AppResult<StatusCode> {
    let name = state.uploads.delete(&filename).await?;
    tracing::info!(user = %user.username, filename = %name, "Deleted stored file");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn discard_upload(state: &AppState, filename: &str) {
    match state.uploads.delete(filename).await {
        Ok(_) => tracing::info!(filename, "Removed upload after failed ingest"),
        Err(e) => tracing::warn!(filename, error = %e, "Failed to remove upload after failed ingest"),
    }
}

/// Read every file entry of a ZIP archive into memory.
///
/// Blocking; run on `spawn_blocking`. Fails once the total uncompressed size
/// exceeds `limit` bytes.
fn read_zip_entries(data: Bytes, limit: u64) -> Result<Vec<(String, Vec<u8>)>, CoreError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| CoreError::Validation(format!("Invalid ZIP archive: {e}")))?;

    let mut entries = Vec::new();
    let mut total: u64 = 0;
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| CoreError::Validation(format!("Invalid ZIP entry {index}: {e}")))?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let mut buf = Vec::new();
        entry
            .by_ref()
            .take(limit - total + 1)
            .read_to_end(&mut buf)
            .map_err(|e| CoreError::Validation(format!("Failed to read ZIP entry '{name}': {e}")))?;

        total += buf.len() as u64;
        if total > limit {
            return Err(CoreError::Validation(format!(
                "ZIP archive expands beyond {limit} bytes"
            )));
        }
        entries.push((name, buf));
    }
    Ok(entries)
}
