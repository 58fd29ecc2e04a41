//! Repositories for the `conversation` answer cache and `chat_session_turns`.

use sqlx::PgPool;

use crate::models::conversation::{
    ChatSessionTurn, ConversationTurn, ROLE_ASSISTANT, ROLE_USER,
};

const CONVERSATION_COLUMNS: &str = "id, question, answer, created_at";

const SESSION_COLUMNS: &str = "id, session_id, role, content, created_at";

/// Append-only cache of answered questions.
pub struct ConversationRepo;

impl ConversationRepo {
    /// Most recent answer recorded for exactly `question`, if any.
    pub async fn latest_answer(
        pool: &PgPool,
        question: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT answer FROM conversation
             WHERE question = $1
             ORDER BY created_at DESC, id DESC
             LIMIT 1",
        )
        .bind(question)
        .fetch_optional(pool)
        .await
    }

    pub async fn record(
        pool: &PgPool,
        question: &str,
        answer: &str,
    ) -> Result<ConversationTurn, sqlx::Error> {
        let query = format!(
            "INSERT INTO conversation (question, answer) VALUES ($1, $2)
             RETURNING {CONVERSATION_COLUMNS}"
        );
        sqlx::query_as::<_, ConversationTurn>(&query)
            .bind(question)
            .bind(answer)
            .fetch_one(pool)
            .await
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<ConversationTurn>, sqlx::Error> {
        let query = format!("SELECT {CONVERSATION_COLUMNS} FROM conversation ORDER BY id");
        sqlx::query_as::<_, ConversationTurn>(&query)
            .fetch_all(pool)
            .await
    }
}

/// Server-held chat history keyed by a caller-supplied session id.
pub struct ChatSessionRepo;

impl ChatSessionRepo {
    /// All turns for a session, oldest first.
    pub async fn history(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<Vec<ChatSessionTurn>, sqlx::Error> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM chat_session_turns
             WHERE session_id = $1
             ORDER BY id"
        );
        sqlx::query_as::<_, ChatSessionTurn>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }

    /// Every stored turn across all sessions, for backups.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<ChatSessionTurn>, sqlx::Error> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM chat_session_turns ORDER BY id");
        sqlx::query_as::<_, ChatSessionTurn>(&query)
            .fetch_all(pool)
            .await
    }

    /// Store a question and its answer as two consecutive turns.
    pub async fn append_exchange(
        pool: &PgPool,
        session_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO chat_session_turns (session_id, role, content)
             VALUES ($1, $2, $3), ($1, $4, $5)",
        )
        .bind(session_id)
        .bind(ROLE_USER)
        .bind(question)
        .bind(ROLE_ASSISTANT)
        .bind(answer)
        .execute(pool)
        .await?;
        Ok(())
    }
}
