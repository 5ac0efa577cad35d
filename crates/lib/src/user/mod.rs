//! Account system for devicehub
//!
//! Provides username/password registration and verification. Passwords are
//! stored only as Argon2id digests.

pub mod account;
pub mod crypto;
pub mod errors;
pub mod store;
pub mod types;

pub use account::AccountService;
pub use errors::UserError;
pub use store::{CredentialStore, DocumentCredentialStore};
pub use types::*;
