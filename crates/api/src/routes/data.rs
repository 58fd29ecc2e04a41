use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::data;
use crate::state::AppState;

/// ```text
/// POST   /add-data            -> add (upsert by name)
/// GET    /get-data            -> list (?query= substring)
/// PUT    /update-data/{id}    -> update
/// DELETE /delete-data/{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add-data", post(data::add))
        .route("/get-data", get(data::list))
        .route("/update-data/{id}", put(data::update))
        .route("/delete-data/{id}", delete(data::delete))
}
