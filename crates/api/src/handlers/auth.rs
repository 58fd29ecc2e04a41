//! Handler for `POST /login-for-access-token`.

use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use distopia_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Login credentials, accepted as a form or as JSON.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// POST /login-for-access-token
///
/// Verify the credentials against the in-memory user table and issue a
/// bearer token.
pub async fn login(
    State(state): State<AppState>,
    request: Request,
) -> AppResult<Json<TokenResponse>> {
    let input = read_credentials(request).await?;

    let users = state.users.clone();
    let username = input.username.clone();
    let valid = tokio::task::spawn_blocking(move || users.authenticate(&username, &input.password))
        .await
        .map_err(|e| AppError::InternalError(format!("Password verification task failed: {e}")))?;

    if !valid {
        tracing::info!(username = %input.username, "Rejected login");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    let access_token = generate_access_token(&input.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(username = %input.username, "Issued access token");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        expires_in: state.config.jwt.expires_in_secs(),
    }))
}

/// JSON when the content type says so, URL-encoded form otherwise.
async fn read_credentials(request: Request) -> AppResult<LoginRequest> {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if is_json {
        let Json(input) = Json::<LoginRequest>::from_request(request, &())
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(input)
    } else {
        let Form(input) = Form::<LoginRequest>::from_request(request, &())
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(input)
    }
}
