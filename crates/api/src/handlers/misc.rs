//! Welcome message and placeholder integrations.
//!
//! The game-status, discord-bot, and RP-event endpoints have no real backing
//! system; they return synthetic data.

use axum::extract::Query;
use axum::Json;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;

const WORLD_EVENTS: [&str; 4] = ["calm", "storm", "festival", "invasion"];

#[derive(Debug, Serialize)]
pub struct Welcome {
    pub message: &'static str,
    pub user: String,
}

#[derive(Debug, Serialize)]
pub struct GameStatus {
    pub status: &'static str,
    pub players_online: u32,
    pub world_event: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct DiscordParams {
    pub command: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DiscordReply {
    pub command: String,
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct RpEventRequest {
    pub event: String,
    pub character: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RpEventOutcome {
    pub event: String,
    pub character: Option<String>,
    /// d20 roll.
    pub roll: u8,
    pub outcome: &'static str,
}

/// GET /
pub async fn root(caller: MaybeAuthUser) -> Json<Welcome> {
    Json(Welcome {
        message: "Welcome to the DisToPia API",
        user: caller.username,
    })
}

/// GET /game-status
pub async fn game_status(_caller: MaybeAuthUser) -> Json<GameStatus> {
    let mut rng = rand::rng();
    Json(GameStatus {
        status: "online",
        players_online: rng.random_range(0..=100),
        world_event: WORLD_EVENTS[rng.random_range(0..WORLD_EVENTS.len())],
    })
}

/// GET /discord-bot
pub async fn discord_bot(
    _caller: MaybeAuthUser,
    Query(params): Query<DiscordParams>,
) -> AppResult<Json<DiscordReply>> {
    let command = params
        .command
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing parameter 'command'".into()))?;

    let response = if command.eq_ignore_ascii_case("ping") {
        "pong".to_string()
    } else {
        command.clone()
    };
    Ok(Json(DiscordReply { command, response }))
}

/// POST /rp-event
pub async fn rp_event(
    _caller: MaybeAuthUser,
    Json(input): Json<RpEventRequest>,
) -> Json<RpEventOutcome> {
    let roll = rand::rng().random_range(1..=20);
    Json(RpEventOutcome {
        event: input.event,
        character: input.character,
        roll,
        outcome: outcome_for(roll),
    })
}

fn outcome_for(roll: u8) -> &'static str {
    match roll {
        20 => "critical success",
        15..=19 => "success",
        8..=14 => "partial success",
        2..=7 => "failure",
        _ => "critical failure",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_cover_the_d20() {
        assert_eq!(outcome_for(1), "critical failure");
        assert_eq!(outcome_for(7), "failure");
        assert_eq!(outcome_for(8), "partial success");
        assert_eq!(outcome_for(19), "success");
        assert_eq!(outcome_for(20), "critical success");
    }
}
