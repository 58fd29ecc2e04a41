//! Question answering over the answer cache, the document corpus, and the
//! language model.

use distopia_core::error::CoreError;
use distopia_core::types::DbId;
use distopia_db::models::conversation::ChatSessionTurn;
use distopia_db::models::document::{CreateDocument, Document};
use distopia_db::repositories::{ChatSessionRepo, ConversationRepo, DocumentRepo};
use distopia_db::DbPool;
use distopia_llm::prompt::build_rag_messages;
use distopia_llm::{ChatMessage, LanguageModel, Role};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::state::AppState;

/// Body of `POST /chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Prior turns held by the client.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    /// Server-held history to prepend and extend.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Record the exchange in the answer cache (default `true`).
    #[serde(default = "default_persist")]
    pub persist: bool,
}

fn default_persist() -> bool {
    true
}

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    Cache,
    Model,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatAnswer {
    pub response: String,
    pub source: AnswerSource,
    /// Ids of the documents passed to the model, nearest first.
    pub context: Vec<DbId>,
}

pub struct ChatService<'a> {
    pool: &'a DbPool,
    llm: &'a dyn LanguageModel,
    top_k: i64,
}

impl<'a> ChatService<'a> {
    pub fn new(pool: &'a DbPool, llm: &'a dyn LanguageModel, top_k: i64) -> Self {
        Self { pool, llm, top_k }
    }

    pub fn from_state(state: &'a AppState) -> Self {
        Self::new(&state.pool, state.llm.as_ref(), state.config.rag_top_k)
    }

    /// Answer one question.
    ///
    /// An exact-text cache hit short-circuits everything else. The question is
    /// used verbatim, so whitespace variants are distinct cache keys. Otherwise the
    /// question is embedded, the nearest documents are retrieved, and the
    /// model completes over system prompt + context + history + question.
    pub async fn ask(&self, request: &AskRequest) -> AppResult<ChatAnswer> {
        let question = request.question.as_str();
        if question.trim().is_empty() {
            return Err(CoreError::Validation("Question must not be empty".into()).into());
        }

        if let Some(cached) = ConversationRepo::latest_answer(self.pool, question).await? {
            tracing::debug!(question, "Answer cache hit");
            return Ok(ChatAnswer {
                response: cached,
                source: AnswerSource::Cache,
                context: Vec::new(),
            });
        }

        let embedding = embed_one(self.llm, question).await?;

        let documents = DocumentRepo::nearest(self.pool, &embedding, self.top_k).await?;
        let context_ids: Vec<DbId> = documents.iter().map(|d| d.id).collect();
        let context: Vec<String> = documents.into_iter().map(|d| d.content).collect();

        let mut history: Vec<ChatMessage> = match &request.session_id {
            Some(session_id) => ChatSessionRepo::history(self.pool, session_id)
                .await?
                .into_iter()
                .map(session_turn_message)
                .collect(),
            None => Vec::new(),
        };
        history.extend(request.history.iter().cloned());

        let messages = build_rag_messages(question, &context, &history);
        let answer = self.llm.complete(&messages).await?;

        if request.persist {
            ConversationRepo::record(self.pool, question, &answer).await?;
        }
        if let Some(session_id) = &request.session_id {
            ChatSessionRepo::append_exchange(self.pool, session_id, question, &answer).await?;
        }

        tracing::info!(
            context_docs = context_ids.len(),
            history_turns = history.len(),
            session_id = ?request.session_id,
            "Answered chat question",
        );

        Ok(ChatAnswer {
            response: answer,
            source: AnswerSource::Model,
            context: context_ids,
        })
    }
}

/// Embed a single text.
pub async fn embed_one(llm: &dyn LanguageModel, text: &str) -> AppResult<Vec<f32>> {
    let embedding = llm
        .embed(&[text.to_string()])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::Upstream("Embedding response was empty".into()))?;
    Ok(embedding)
}

/// Embed `input.content` and add it to the retrieval corpus.
pub async fn ingest_document(state: &AppState, input: &CreateDocument) -> AppResult<Document> {
    if input.content.trim().is_empty() {
        return Err(CoreError::Validation("Document content must not be empty".into()).into());
    }
    let embedding = embed_one(state.llm.as_ref(), &input.content).await?;
    let document = DocumentRepo::insert(&state.pool, input, &embedding).await?;
    tracing::info!(id = document.id, source = %document.source, "Added document to corpus");
    Ok(document)
}

fn session_turn_message(turn: ChatSessionTurn) -> ChatMessage {
    ChatMessage {
        role: Role::from_name(&turn.role),
        content: turn.content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_request_defaults() {
        let req: AskRequest = serde_json::from_str(r#"{"question": "Who is Elara?"}"#).unwrap();
        assert!(req.persist);
        assert!(req.history.is_empty());
        assert!(req.session_id.is_none());
    }

    #[test]
    fn ask_request_accepts_history() {
        let req: AskRequest = serde_json::from_str(
            r#"{"question": "q", "persist": false, "history": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"}
            ]}"#,
        )
        .unwrap();
        assert!(!req.persist);
        assert_eq!(req.history[1], ChatMessage::assistant("hello"));
    }

    #[test]
    fn answer_source_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&AnswerSource::Cache).unwrap(), "\"cache\"");
    }
}
