//! Handlers for `/chat` and the retrieval document corpus.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use distopia_core::error::CoreError;
use distopia_core::types::DbId;
use distopia_db::models::document::{CreateDocument, Document};
use distopia_db::repositories::DocumentRepo;

use crate::chat::{ingest_document, AskRequest, ChatAnswer, ChatService};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::{DataResponse, MessageDataResponse};
use crate::state::AppState;

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    Json(request): Json<AskRequest>,
) -> AppResult<Json<ChatAnswer>> {
    tracing::debug!(user = %caller.username, "Chat question received");
    let answer = ChatService::from_state(&state).ask(&request).await?;
    Ok(Json(answer))
}

/// POST /add-document
pub async fn add_document(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateDocument>,
) -> AppResult<(StatusCode, Json<MessageDataResponse<Document>>)> {
    let document = ingest_document(&state, &input).await?;
    tracing::info!(user = %user.username, id = document.id, "Document added");
    Ok((
        StatusCode::CREATED,
        Json(MessageDataResponse {
            message: format!("Document {} added", document.id),
            data: document,
        }),
    ))
}

/// GET /documents
pub async fn list_documents(
    State(state): State<AppState>,
    _caller: MaybeAuthUser,
) -> AppResult<Json<DataResponse<Vec<Document>>>> {
    let documents = DocumentRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// DELETE /delete-document/{id}
pub async fn delete_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if DocumentRepo::delete(&state.pool, id).await? {
        tracing::info!(user = %user.username, id, "Deleted document");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Document", id)))
    }
}
