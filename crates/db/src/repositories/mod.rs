//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod conversation_repo;
pub mod data_repo;
pub mod document_repo;
pub mod feedback_repo;
pub mod lore_repo;

pub use conversation_repo::{ChatSessionRepo, ConversationRepo};
pub use data_repo::DataRepo;
pub use document_repo::DocumentRepo;
pub use feedback_repo::FeedbackRepo;
pub use lore_repo::LoreRepo;

use distopia_core::lore::DESCRIPTION_SEPARATOR;

/// SQL expression that appends `EXCLUDED.{column}` to `{table}.{column}`
/// inside an `ON CONFLICT ... DO UPDATE`.
///
/// An empty side never produces a stray separator: appending `''` keeps the
/// old value, and appending to `''` takes the new value verbatim.
pub(crate) fn append_on_conflict(table: &str, column: &str) -> String {
    format!(
        "CASE \
            WHEN EXCLUDED.{column} = '' THEN {table}.{column} \
            WHEN {table}.{column} = '' THEN EXCLUDED.{column} \
            ELSE {table}.{column} || '{DESCRIPTION_SEPARATOR}' || EXCLUDED.{column} \
         END"
    )
}
