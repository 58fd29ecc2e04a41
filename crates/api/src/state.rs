use std::sync::Arc;

use distopia_core::storage::UploadDir;
use distopia_llm::LanguageModel;

use crate::auth::users::UserStore;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already a handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: distopia_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Upload directory store.
    pub uploads: UploadDir,
    /// In-memory login table.
    pub users: Arc<UserStore>,
    /// Embedding and chat-completion backend.
    pub llm: Arc<dyn LanguageModel>,
}
