use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::files;
use crate::state::AppState;

/// ```text
/// POST   /upload/                       -> upload (?ingest=true)
/// POST   /upload-zip/                   -> upload_zip
/// GET    /uploaded-files/               -> list
/// GET    /download/{filename}           -> download
/// GET    /download-file/{filename}/     -> download
/// DELETE /delete-file/{filename}        -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload/", post(files::upload))
        .route("/upload-zip/", post(files::upload_zip))
        .route("/uploaded-files/", get(files::list))
        .route("/download/{filename}", get(files::download))
        .route("/download-file/{filename}/", get(files::download))
        .route("/delete-file/{filename}", delete(files::delete))
}
