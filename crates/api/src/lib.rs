//! HTTP server for the DisToPia world: lore storage, file uploads,
//! retrieval-augmented chat, and per-user feedback.
//!
//! The binary in `main.rs` wires configuration, the database pool, and the
//! language model client into [`state::AppState`] and serves
//! [`router::build_app_router`].

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod render;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
