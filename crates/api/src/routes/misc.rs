use axum::routing::{get, post};
use axum::Router;

use crate::handlers::misc;
use crate::state::AppState;

/// ```text
/// GET  /              -> root
/// GET  /game-status   -> game_status
/// GET  /discord-bot   -> discord_bot (?command=)
/// POST /rp-event      -> rp_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(misc::root))
        .route("/game-status", get(misc::game_status))
        .route("/discord-bot", get(misc::discord_bot))
        .route("/rp-event", post(misc::rp_event))
}
