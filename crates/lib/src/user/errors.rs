//! Error types for the account system
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("user already exists")]
    UserExists { username: String },

    #[error("username is empty")]
    EmptyUsername,

    #[error("Password hashing failed: {reason}")]
    HashingFailed { reason: String },
}

impl UserError {
    /// Check if this error indicates the account already exists.
    pub fn is_conflict(&self) -> bool {
        matches!(self, UserError::UserExists { .. })
    }

    /// Check if this error is caused by invalid caller input.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, UserError::EmptyUsername)
    }
}

impl From<UserError> for crate::Error {
    fn from(err: UserError) -> Self {
        crate::Error::User(err)
    }
}
