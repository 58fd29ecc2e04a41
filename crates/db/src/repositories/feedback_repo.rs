//! Repository for `user_feedback` and `user_preferences`.

use sqlx::PgPool;

use super::append_on_conflict;
use crate::models::feedback::{UserFeedback, UserPreferences};

pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Append `text` to the user's accumulated feedback (created on first use).
    pub async fn append_feedback(
        pool: &PgPool,
        username: &str,
        text: &str,
    ) -> Result<UserFeedback, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_feedback (username, feedback)
             VALUES ($1, $2)
             ON CONFLICT (username) DO UPDATE SET
                feedback = {},
                updated_at = NOW()
             RETURNING username, feedback, updated_at",
            append_on_conflict("user_feedback", "feedback")
        );
        sqlx::query_as::<_, UserFeedback>(&query)
            .bind(username)
            .bind(text)
            .fetch_one(pool)
            .await
    }

    pub async fn list_feedback(pool: &PgPool) -> Result<Vec<UserFeedback>, sqlx::Error> {
        sqlx::query_as::<_, UserFeedback>(
            "SELECT username, feedback, updated_at FROM user_feedback ORDER BY username",
        )
        .fetch_all(pool)
        .await
    }

    /// Replace the user's preferences.
    pub async fn set_preferences(
        pool: &PgPool,
        username: &str,
        preferences: &str,
    ) -> Result<UserPreferences, sqlx::Error> {
        sqlx::query_as::<_, UserPreferences>(
            "INSERT INTO user_preferences (username, preferences)
             VALUES ($1, $2)
             ON CONFLICT (username) DO UPDATE SET
                preferences = EXCLUDED.preferences,
                updated_at = NOW()
             RETURNING username, preferences, updated_at",
        )
        .bind(username)
        .bind(preferences)
        .fetch_one(pool)
        .await
    }

    pub async fn list_preferences(pool: &PgPool) -> Result<Vec<UserPreferences>, sqlx::Error> {
        sqlx::query_as::<_, UserPreferences>(
            "SELECT username, preferences, updated_at FROM user_preferences ORDER BY username",
        )
        .fetch_all(pool)
        .await
    }
}
