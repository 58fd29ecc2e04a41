//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`users`] -- the in-memory user table built from configuration.

pub mod jwt;
pub mod password;
pub mod users;
