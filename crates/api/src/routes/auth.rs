use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// POST /login-for-access-token  -> login (form or JSON)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/login-for-access-token", post(auth::login))
}
