//! Handlers for the lore tables (characters, species, regions).
//!
//! `/remember/` and `/dtp-chat/` accept their parameters either in the query
//! string or as a JSON body; query values win when both are present.

use axum::body::Bytes;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use distopia_core::error::CoreError;
use distopia_core::lore::LoreCategory;
use distopia_core::types::DbId;
use distopia_db::models::lore::{CreateCharacter, LoreSnapshot, LoreStats};
use distopia_db::repositories::LoreRepo;
use serde::{Deserialize, Serialize};

use super::{parse_optional_json, read_file_field};
use crate::error::{AppError, AppResult};
use crate::handlers::data::SearchParams;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::render;
use crate::response::{DataResponse, MessageDataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct RememberParams {
    pub category: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RememberParams {
    fn or(self, other: Self) -> Self {
        Self {
            category: self.category.or(other.category),
            name: self.name.or(other.name),
            description: self.description.or(other.description),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RememberedRow {
    pub category: LoreCategory,
    pub id: DbId,
    pub name: String,
    pub created: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorldChatParams {
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FormattedData {
    pub formatted_data: String,
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /remember/
///
/// Upsert a lore row by name. Appending to an existing row flags it new again.
pub async fn remember(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RememberParams>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<MessageDataResponse<RememberedRow>>)> {
    let params = match parse_optional_json::<RememberParams>(&body)? {
        Some(json) => query.or(json),
        None => query,
    };

    let category = LoreCategory::from_name(
        params
            .category
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("Missing parameter 'category'".into()))?,
    )?;
    let name = params
        .name
        .ok_or_else(|| AppError::BadRequest("Missing parameter 'name'".into()))?;
    let description = params.description.unwrap_or_default();

    let outcome = LoreRepo::remember(&state.pool, category, &name, &description).await?;
    let created = outcome.is_created();
    let id = outcome.into_inner();

    tracing::info!(user = %user.username, %category, %name, created, "Remembered lore");

    let (status, message) = if created {
        (StatusCode::CREATED, format!("New {category} '{name}' saved"))
    } else {
        (StatusCode::OK, format!("Existing {category} '{name}' updated"))
    };

    Ok((
        status,
        Json(MessageDataResponse {
            message,
            data: RememberedRow {
                category,
                id,
                name,
                created,
            },
        }),
    ))
}

/// GET /all-data/
pub async fn all_data(
    State(state): State<AppState>,
    _caller: MaybeAuthUser,
) -> AppResult<Json<DataResponse<LoreSnapshot>>> {
    let snapshot = LoreRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: snapshot }))
}

/// GET /formatted-data/
pub async fn formatted_data(
    State(state): State<AppState>,
    _caller: MaybeAuthUser,
) -> AppResult<Json<FormattedData>> {
    let snapshot = LoreRepo::list_all(&state.pool).await?;
    Ok(Json(FormattedData {
        formatted_data: render::lore_markdown(&snapshot),
    }))
}

/// GET /visualized-data/
pub async fn visualized_data(
    State(state): State<AppState>,
    _caller: MaybeAuthUser,
) -> AppResult<Html<String>> {
    let snapshot = LoreRepo::list_all(&state.pool).await?;
    Ok(Html(render::lore_html(&snapshot)))
}

/// POST /confirm-view/
pub async fn confirm_view(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<MessageResponse>> {
    let cleared = LoreRepo::confirm_view(&state.pool).await?;
    tracing::info!(user = %user.username, cleared, "Cleared new-lore flags");
    Ok(Json(MessageResponse::new(format!(
        "Marked {cleared} new entries as viewed"
    ))))
}

/// GET /search-data/
pub async fn search(
    State(state): State<AppState>,
    _caller: MaybeAuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<LoreSnapshot>>> {
    let substring = params
        .query
        .ok_or_else(|| AppError::BadRequest("Missing parameter 'query'".into()))?;
    let hits = LoreRepo::search(&state.pool, &substring).await?;
    Ok(Json(DataResponse { data: hits }))
}

/// GET /data-info/
pub async fn data_info(
    State(state): State<AppState>,
    _caller: MaybeAuthUser,
) -> AppResult<Json<DataResponse<LoreStats>>> {
    let stats = LoreRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// DELETE /delete-data/{category}/{name}/
pub async fn delete_by_name(
    State(state): State<AppState>,
    user: AuthUser,
    Path((category, name)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let category = LoreCategory::from_name(&category)?;
    if LoreRepo::delete_by_name(&state.pool, category, &name).await? {
        tracing::info!(user = %user.username, %category, %name, "Deleted lore");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found(category.name(), name)))
    }
}

/// POST /import-characters/
///
/// Multipart upload whose `file` field holds a JSON array of characters.
pub async fn import_characters(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<MessageDataResponse<ImportSummary>>> {
    let (filename, data) = read_file_field(&mut multipart).await?;

    let rows: Vec<CreateCharacter> = serde_json::from_slice(&data)
        .map_err(|e| AppError::BadRequest(format!("'{filename}' is not a JSON array of characters: {e}")))?;

    if let Some(pos) = rows.iter().position(|r| r.name.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Character at index {pos} has an empty name"
        ))));
    }

    let imported = LoreRepo::import_characters(&state.pool, &rows).await?;
    tracing::info!(user = %user.username, %filename, imported, "Imported characters");

    Ok(Json(MessageDataResponse {
        message: format!("Imported {imported} characters"),
        data: ImportSummary { imported },
    }))
}

/// POST /dtp-chat/
///
/// Keyword lookup over the lore tables. No language model involved.
pub async fn world_chat(
    State(state): State<AppState>,
    _caller: MaybeAuthUser,
    Query(query): Query<WorldChatParams>,
    body: Bytes,
) -> AppResult<Json<MessageResponse>> {
    let question = match query.question {
        Some(q) => q,
        None => parse_optional_json::<WorldChatParams>(&body)?
            .and_then(|p| p.question)
            .ok_or_else(|| AppError::BadRequest("Missing parameter 'question'".into()))?,
    };

    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Question must not be empty".into(),
        )));
    }

    let hits = LoreRepo::search(&state.pool, question).await?;
    Ok(Json(MessageResponse::new(render::world_chat_reply(&hits))))
}
