use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// GET  /create-table    -> create_table
/// GET  /backup-db       -> backup_db
/// POST /backup-memory   -> backup_memory
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-table", get(admin::create_table))
        .route("/backup-db", get(admin::backup_db))
        .route("/backup-memory", post(admin::backup_memory))
}
