//! Handlers for the generic `dtp_data` records.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use distopia_core::error::CoreError;
use distopia_core::types::DbId;
use distopia_db::models::data::{CreateDataEntry, DataEntry, UpdateDataEntry};
use distopia_db::repositories::DataRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::{DataResponse, MessageDataResponse};
use crate::state::AppState;

/// Optional `?query=` name filter.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// POST /add-data
///
/// Creates the row (201) or appends the description to the existing row of
/// the same name (200).
pub async fn add(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateDataEntry>,
) -> AppResult<(StatusCode, Json<MessageDataResponse<DataEntry>>)> {
    let outcome = DataRepo::upsert_append(&state.pool, &input.name, &input.description).await?;
    let (status, verb) = if outcome.is_created() {
        (StatusCode::CREATED, "created")
    } else {
        (StatusCode::OK, "updated")
    };
    let entry = outcome.into_inner();

    tracing::info!(user = %user.username, id = entry.id, name = %entry.name, verb, "Upserted data entry");

    Ok((
        status,
        Json(MessageDataResponse {
            message: format!("Data '{}' {verb}", entry.name),
            data: entry,
        }),
    ))
}

/// GET /get-data
pub async fn list(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<DataEntry>>>> {
    let rows = match params.query.as_deref() {
        Some(substring) => DataRepo::search(&state.pool, substring).await?,
        None => DataRepo::list_all(&state.pool).await?,
    };
    tracing::debug!(user = %caller.username, count = rows.len(), "Listed data entries");
    Ok(Json(DataResponse { data: rows }))
}

/// PUT /update-data/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDataEntry>,
) -> AppResult<Json<MessageDataResponse<DataEntry>>> {
    let entry = DataRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Data", id)))?;

    tracing::info!(user = %user.username, id, "Overwrote data entry");

    Ok(Json(MessageDataResponse {
        message: format!("Data {id} updated"),
        data: entry,
    }))
}

/// DELETE /delete-data/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if DataRepo::delete(&state.pool, id).await? {
        tracing::info!(user = %user.username, id, "Deleted data entry");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Data", id)))
    }
}
