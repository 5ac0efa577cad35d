//! Core data types for the account system

use serde::{Deserialize, Serialize};

/// Stored account record, keyed by username in the `users` collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredential {
    pub username: String,
    /// Argon2id digest (PHC string)
    pub password_digest: String,
}

/// Username and password as submitted by a client.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
