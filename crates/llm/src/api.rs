//! REST client for an OpenAI-compatible API.
//!
//! Wraps `POST {base}/chat/completions` and `POST {base}/embeddings` using
//! [`reqwest`] with bearer authentication.

use serde::de::DeserializeOwned;

use crate::messages::{ChatCompletionResponse, ChatMessage, EmbeddingResponse};

/// HTTP client for one OpenAI-compatible endpoint.
pub struct OpenAiApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
}

/// Errors from the generation API layer.
#[derive(Debug, thiserror::Error)]
pub enum LlmApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("LLM API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response carried no choices or no embeddings.
    #[error("LLM API returned an empty {0} response")]
    EmptyResponse(&'static str),
}

impl OpenAiApi {
    /// Create a new API client.
    ///
    /// * `base_url` - e.g. `https://api.openai.com/v1`. A trailing slash is ignored.
    pub fn new(
        api_key: String,
        base_url: String,
        chat_model: String,
        embedding_model: String,
    ) -> Self {
        Self::with_client(
            reqwest::Client::new(),
            api_key,
            base_url,
            chat_model,
            embedding_model,
        )
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        chat_model: String,
        embedding_model: String,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            chat_model,
            embedding_model,
        }
    }

    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    /// Run a chat completion and return the first choice's text.
    pub async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<String, LlmApiError> {
        let body = serde_json::json!({
            "model": self.chat_model,
            "messages": messages,
        });

        tracing::debug!(
            model = %self.chat_model,
            message_count = messages.len(),
            "Requesting chat completion",
        );

        let response = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: ChatCompletionResponse = Self::parse_response(response).await?;
        parsed
            .into_text()
            .ok_or(LlmApiError::EmptyResponse("chat completion"))
    }

    /// Embed every input with the configured embedding model.
    pub async fn embeddings(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmApiError> {
        let body = serde_json::json!({
            "model": self.embedding_model,
            "input": inputs,
        });

        let response = self
            .client
            .post(self.url("embeddings"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: EmbeddingResponse = Self::parse_response(response).await?;
        let vectors = parsed.into_vectors();
        if vectors.len() != inputs.len() {
            return Err(LlmApiError::EmptyResponse("embedding"));
        }
        Ok(vectors)
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Ensure the response has a success status code, or capture the status
    /// and body text in [`LlmApiError::ApiError`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, LlmApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LlmApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, LlmApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
