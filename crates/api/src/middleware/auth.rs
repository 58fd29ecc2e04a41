//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use distopia_core::error::CoreError;

use crate::auth::jwt::{validate_token, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// Identity used when a request carries no token.
pub const ANONYMOUS: &str = "anonymous";

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user = %user.username, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The username from `claims.sub`.
    pub username: String,
}

/// Caller identity for endpoints that do not require login.
///
/// A missing `Authorization` header resolves to [`ANONYMOUS`]. A header that
/// is present but malformed, badly signed, or expired is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser {
    pub username: String,
    pub authenticated: bool,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state)?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;

        Ok(AuthUser {
            username: claims.sub,
        })
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(match bearer_claims(parts, state)? {
            Some(claims) => MaybeAuthUser {
                username: claims.sub,
                authenticated: true,
            },
            None => MaybeAuthUser {
                username: ANONYMOUS.to_string(),
                authenticated: false,
            },
        })
    }
}

/// Decode the bearer token, if an `Authorization` header is present.
fn bearer_claims(parts: &Parts, state: &AppState) -> Result<Option<Claims>, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

    let claims = validate_token(token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    Ok(Some(claims))
}
