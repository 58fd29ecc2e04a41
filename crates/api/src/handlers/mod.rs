//! HTTP request handlers, one module per resource.
//!
//! Handlers decode parameters, call one repository or service, and serialize
//! the result. Shared body-decoding helpers live here.

pub mod admin;
pub mod auth;
pub mod chat;
pub mod data;
pub mod feedback;
pub mod files;
pub mod lore;
pub mod misc;

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// Parse a JSON body if one was sent. An empty body yields `None`.
pub(crate) fn parse_optional_json<T: DeserializeOwned>(body: &Bytes) -> AppResult<Option<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}

/// Read the multipart field named `file`, returning its client filename and bytes.
pub(crate) async fn read_file_field(multipart: &mut Multipart) -> AppResult<(String, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Multipart field 'file' has no filename".into()))?;

        let data = field.bytes().await.map_err(multipart_error)?;

        return Ok((filename, data));
    }

    Err(AppError::BadRequest("Missing multipart field 'file'".into()))
}

/// Keep the body-limit status instead of folding it into a 400.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
