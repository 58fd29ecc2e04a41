use std::path::PathBuf;

use distopia_core::storage::DEFAULT_UPLOAD_DIR;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Everything except the database URL, JWT secret, and LLM API key has a
/// default suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Directory holding uploaded files (default: `uploads`).
    pub upload_dir: PathBuf,
    /// Maximum request body size in bytes (default: 50 MiB).
    pub max_upload_bytes: usize,
    /// Raw `user:password,...` list for the in-memory user table.
    pub auth_users: String,
    /// Number of documents retrieved per chat question (default: `3`).
    pub rag_top_k: i64,
    /// File that `/backup-memory` appends to (default: `backup_memory.log`).
    pub backup_log_path: PathBuf,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    /// Generation service configuration.
    pub llm: LlmConfig,
}

/// Connection settings for the OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
}

impl LlmConfig {
    /// | Env Var                  | Required | Default                     |
    /// |--------------------------|----------|-----------------------------|
    /// | `OPENAI_API_KEY`         | **yes**  | --                          |
    /// | `OPENAI_BASE_URL`        | no       | `https://api.openai.com/v1` |
    /// | `OPENAI_CHAT_MODEL`      | no       | `gpt-4`                     |
    /// | `OPENAI_EMBEDDING_MODEL` | no       | `text-embedding-ada-002`    |
    ///
    /// # Panics
    ///
    /// Panics if `OPENAI_API_KEY` is not set or is empty.
    pub fn from_env() -> Self {
        let api_key =
            std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set in the environment");
        assert!(!api_key.is_empty(), "OPENAI_API_KEY must not be empty");

        Self {
            api_key,
            base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            chat_model: env_or("OPENAI_CHAT_MODEL", "gpt-4"),
            embedding_model: env_or("OPENAI_EMBEDDING_MODEL", "text-embedding-ada-002"),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:8501`    |
    /// | `REQUEST_TIMEOUT_SECS` | `60`                       |
    /// | `UPLOAD_DIR`           | `uploads`                  |
    /// | `MAX_UPLOAD_BYTES`     | `52428800`                 |
    /// | `AUTH_USERS`           | empty                      |
    /// | `RAG_TOP_K`            | `3`                        |
    /// | `BACKUP_LOG_PATH`      | `backup_memory.log`        |
    ///
    /// JWT and LLM settings are loaded by [`JwtConfig::from_env`] and
    /// [`LlmConfig::from_env`].
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "8000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:8501")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "60")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = env_or("MAX_UPLOAD_BYTES", "52428800")
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let rag_top_k: i64 = env_or("RAG_TOP_K", "3")
            .parse()
            .expect("RAG_TOP_K must be a valid i64");
        assert!(rag_top_k > 0, "RAG_TOP_K must be positive");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
            max_upload_bytes,
            auth_users: std::env::var("AUTH_USERS").unwrap_or_default(),
            rag_top_k,
            backup_log_path: PathBuf::from(env_or("BACKUP_LOG_PATH", "backup_memory.log")),
            jwt: JwtConfig::from_env(),
            llm: LlmConfig::from_env(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}
