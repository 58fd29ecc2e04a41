use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::lore;
use crate::state::AppState;

/// ```text
/// POST   /remember/                        -> remember
/// GET    /all-data/                        -> all_data
/// GET    /formatted-data/                  -> formatted_data (Markdown)
/// GET    /visualized-data/                 -> visualized_data (HTML)
/// POST   /confirm-view/                    -> confirm_view
/// GET    /search-data/                     -> search
/// GET    /data-info/                       -> data_info
/// DELETE /delete-data/{category}/{name}/   -> delete_by_name
/// POST   /import-characters/               -> import_characters (multipart)
/// POST   /dtp-chat/                        -> world_chat
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/remember/", post(lore::remember))
        .route("/all-data/", get(lore::all_data))
        .route("/formatted-data/", get(lore::formatted_data))
        .route("/visualized-data/", get(lore::visualized_data))
        .route("/confirm-view/", post(lore::confirm_view))
        .route("/search-data/", get(lore::search))
        .route("/data-info/", get(lore::data_info))
        .route("/delete-data/{category}/{name}/", delete(lore::delete_by_name))
        .route("/import-characters/", post(lore::import_characters))
        .route("/dtp-chat/", post(lore::world_chat))
}
