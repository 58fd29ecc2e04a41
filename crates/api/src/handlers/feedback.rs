//! Handlers for per-user growth feedback and personalization.
//!
//! The target user is taken from the body when given, otherwise from the
//! caller's identity (`anonymous` without a token).

use axum::extract::State;
use axum::Json;
use distopia_core::error::CoreError;
use distopia_db::models::feedback::{UserFeedback, UserPreferences};
use distopia_db::repositories::FeedbackRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;
use crate::response::MessageDataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub user: Option<String>,
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct PersonalizationRequest {
    pub user: Option<String>,
    pub preferences: String,
}

/// POST /growth-feedback
///
/// Appends to the user's accumulated feedback.
pub async fn growth_feedback(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    Json(input): Json<FeedbackRequest>,
) -> AppResult<Json<MessageDataResponse<UserFeedback>>> {
    if input.feedback.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Feedback must not be empty".into(),
        )));
    }
    let username = target_user(input.user, &caller);

    let row = FeedbackRepo::append_feedback(&state.pool, &username, &input.feedback).await?;
    tracing::info!(caller = %caller.username, user = %username, "Recorded growth feedback");

    Ok(Json(MessageDataResponse {
        message: format!("Feedback recorded for '{username}'"),
        data: row,
    }))
}

/// POST /update-personalization
///
/// Replaces the user's preferences.
pub async fn update_personalization(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    Json(input): Json<PersonalizationRequest>,
) -> AppResult<Json<MessageDataResponse<UserPreferences>>> {
    let username = target_user(input.user, &caller);

    let row = FeedbackRepo::set_preferences(&state.pool, &username, &input.preferences).await?;
    tracing::info!(caller = %caller.username, user = %username, "Updated personalization");

    Ok(Json(MessageDataResponse {
        message: format!("Preferences updated for '{username}'"),
        data: row,
    }))
}

fn target_user(explicit: Option<String>, caller: &MaybeAuthUser) -> String {
    explicit
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| caller.username.clone())
}
