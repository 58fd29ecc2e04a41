use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// ```text
/// POST   /chat                    -> chat
/// POST   /add-document            -> add_document
/// GET    /documents               -> list_documents
/// DELETE /delete-document/{id}    -> delete_document
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::chat))
        .route("/add-document", post(chat::add_document))
        .route("/documents", get(chat::list_documents))
        .route("/delete-document/{id}", delete(chat::delete_document))
}
