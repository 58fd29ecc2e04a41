//! Request extractors for caller identity.
//!
//! - [`auth::AuthUser`] -- requires a valid JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- falls back to `anonymous` when no token is sent.

pub mod auth;
