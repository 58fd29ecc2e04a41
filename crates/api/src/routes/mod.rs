pub mod admin;
pub mod auth;
pub mod chat;
pub mod data;
pub mod feedback;
pub mod files;
pub mod health;
pub mod lore;
pub mod misc;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree. Every path is mounted at the root.
///
/// ```text
/// /                                   welcome
/// /health                             service + database health
/// /login-for-access-token             issue bearer token
///
/// /add-data /get-data                 generic records
/// /update-data/{id} /delete-data/{id}
///
/// /remember/ /all-data/               lore
/// /formatted-data/ /visualized-data/
/// /confirm-view/ /search-data/ /data-info/
/// /delete-data/{category}/{name}/
/// /import-characters/ /dtp-chat/
///
/// /upload/ /upload-zip/               files
/// /uploaded-files/ /download/{filename}
/// /download-file/{filename}/ /delete-file/{filename}
///
/// /chat /add-document /documents     chat + retrieval corpus
/// /delete-document/{id}
///
/// /growth-feedback                    per-user feedback
/// /update-personalization
///
/// /game-status /discord-bot /rp-event placeholders
///
/// /create-table /backup-db            schema + backups
/// /backup-memory
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(misc::router())
        .merge(health::router())
        .merge(auth::router())
        .merge(data::router())
        .merge(lore::router())
        .merge(files::router())
        .merge(chat::router())
        .merge(feedback::router())
        .merge(admin::router())
}
