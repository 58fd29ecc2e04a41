use axum::routing::post;
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/growth-feedback", post(feedback::growth_feedback))
        .route("/update-personalization", post(feedback::update_personalization))
}
