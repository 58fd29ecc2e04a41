//! Schema management and backup handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use distopia_core::error::CoreError;
use distopia_core::types::Timestamp;
use distopia_db::models::conversation::{ChatSessionTurn, ConversationTurn};
use distopia_db::models::data::DataEntry;
use distopia_db::models::document::Document;
use distopia_db::models::feedback::{UserFeedback, UserPreferences};
use distopia_db::models::lore::{Character, Region, Species};
use distopia_db::repositories::{
    ChatSessionRepo, ConversationRepo, DataRepo, DocumentRepo, FeedbackRepo, LoreRepo,
};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::MessageResponse;
use crate::state::AppState;

/// Full table dump returned by `/backup-db`. Document embeddings are omitted.
#[derive(Debug, Serialize)]
pub struct DatabaseBackup {
    pub exported_at: Timestamp,
    pub dtp_data: Vec<DataEntry>,
    pub characters: Vec<Character>,
    pub species: Vec<Species>,
    pub regions: Vec<Region>,
    pub conversation: Vec<ConversationTurn>,
    pub chat_session_turns: Vec<ChatSessionTurn>,
    pub documents: Vec<Document>,
    pub user_feedback: Vec<UserFeedback>,
    pub user_preferences: Vec<UserPreferences>,
}

#[derive(Debug, Deserialize)]
pub struct BackupMemoryRequest {
    pub content: String,
}

/// GET /create-table
///
/// Applies any pending migrations. Safe to call repeatedly.
pub async fn create_table(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<MessageResponse>> {
    distopia_db::run_migrations(&state.pool)
        .await
        .map_err(|e| AppError::InternalError(format!("Migration failed: {e}")))?;
    tracing::info!(user = %user.username, "Schema migrations applied on request");
    Ok(Json(MessageResponse::new("Tables are up to date")))
}

/// GET /backup-db
pub async fn backup_db(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
) -> AppResult<Json<DatabaseBackup>> {
    let pool = &state.pool;
    let lore = LoreRepo::list_all(pool).await?;

    let backup = DatabaseBackup {
        exported_at: Utc::now(),
        dtp_data: DataRepo::list_all(pool).await?,
        characters: lore.characters,
        species: lore.species,
        regions: lore.regions,
        conversation: ConversationRepo::list_all(pool).await?,
        chat_session_turns: ChatSessionRepo::list_all(pool).await?,
        documents: DocumentRepo::list(pool).await?,
        user_feedback: FeedbackRepo::list_feedback(pool).await?,
        user_preferences: FeedbackRepo::list_preferences(pool).await?,
    };

    tracing::info!(user = %caller.username, "Database backup exported");
    Ok(Json(backup))
}

/// POST /backup-memory
///
/// Appends one line (`<rfc3339>\t<user>\t<content>`) to the backup log.
pub async fn backup_memory(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    Json(input): Json<BackupMemoryRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let line = memory_line(Utc::now(), &caller.username, &input.content);

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&state.config.backup_log_path)
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to open backup log: {e}")))?;
    file.write_all(line.as_bytes())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to write backup log: {e}")))?;

    tracing::info!(user = %caller.username, "Appended memory backup line");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Memory backed up")),
    ))
}

/// Format one log line. Embedded line breaks become spaces.
fn memory_line(at: Timestamp, user: &str, content: &str) -> String {
    let flat: String = content
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    format!("{}\t{user}\t{flat}\n", at.to_rfc3339())
}
