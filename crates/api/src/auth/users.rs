//! In-memory user table.
//!
//! Built once at startup from `AUTH_USERS` (`user:password` pairs separated
//! by commas). Only Argon2id hashes are kept; plaintext is dropped after
//! hashing.

use std::collections::HashMap;

use distopia_core::error::CoreError;

use super::password::{hash_password, verify_password};

#[derive(Debug, Default)]
pub struct UserStore {
    hashes: HashMap<String, String>,
}

impl UserStore {
    /// Parse a `user:password,user2:password2` list.
    ///
    /// Whitespace around entries is ignored and empty entries are skipped. The
    /// password is everything after the first `:`, so it may itself contain
    /// colons.
    pub fn from_list(list: &str) -> Result<Self, CoreError> {
        let mut pairs = Vec::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (user, password) = entry.split_once(':').ok_or_else(|| {
                CoreError::Validation(format!("AUTH_USERS entry '{entry}' must be user:password"))
            })?;
            let user = user.trim();
            if user.is_empty() || password.is_empty() {
                return Err(CoreError::Validation(format!(
                    "AUTH_USERS entry '{entry}' has an empty username or password"
                )));
            }
            pairs.push((user.to_string(), password.to_string()));
        }
        Self::from_credentials(pairs)
    }

    /// Hash each password and build the table. Later duplicates win.
    pub fn from_credentials<I>(credentials: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut hashes = HashMap::new();
        for (user, password) in credentials {
            let hash = hash_password(&password)
                .map_err(|e| CoreError::Internal(format!("Failed to hash password: {e}")))?;
            hashes.insert(user, hash);
        }
        Ok(Self { hashes })
    }

    /// `true` when `username` exists and `password` matches its hash.
    ///
    /// Runs Argon2 verification, so call it off the async worker threads.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        let Some(hash) = self.hashes.get(username) else {
            return false;
        };
        match verify_password(password, hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::error!(username, error = %e, "Stored password hash is malformed");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
