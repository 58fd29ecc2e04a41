//! Per-user growth feedback and personalization preferences.

use distopia_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserFeedback {
    pub username: String,
    pub feedback: String,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserPreferences {
    pub username: String,
    pub preferences: String,
    pub updated_at: Timestamp,
}
