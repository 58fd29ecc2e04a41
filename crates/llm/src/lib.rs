//! Client for an OpenAI-compatible generation service.
//!
//! Provides:
//! - [`api::OpenAiApi`]: REST client for chat completions and embeddings.
//! - [`LanguageModel`]: the seam the chat service depends on, so tests can
//!   substitute a scripted model.
//! - [`prompt`]: assembly of retrieval-augmented chat prompts.

pub mod api;
pub mod messages;
pub mod prompt;

use async_trait::async_trait;

pub use api::{LlmApiError, OpenAiApi};
pub use messages::{ChatMessage, Role};

/// A text-generation backend able to embed text and complete a chat.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Embed each input, returning one vector per input in the same order.
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmApiError>;

    /// Complete a chat and return the assistant's reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmApiError>;
}

#[async_trait]
impl LanguageModel for OpenAiApi {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmApiError> {
        self.embeddings(inputs).await
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmApiError> {
        self.chat_completion(messages).await
    }
}
