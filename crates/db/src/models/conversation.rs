//! Answer cache rows and server-held chat session turns.

use distopia_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A cached question/answer pair from the `conversation` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversationTurn {
    pub id: DbId,
    pub question: String,
    pub answer: String,
    pub created_at: Timestamp,
}

/// Role of a stored session turn. Matches the `role` CHECK constraint.
pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

/// One message in a `chat_session_turns` history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatSessionTurn {
    pub id: DbId,
    pub session_id: String,
    pub role: String,
    pub content: String,
    pub created_at: Timestamp,
}
