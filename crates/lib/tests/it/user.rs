//! Account registration and credential checks.

use devicehub::{
    Error,
    session::AuthError,
    user::{CredentialStore, DocumentCredentialStore, UserError},
};

use crate::helpers::{accounts, test_store};

#[tokio::test]
async fn test_registered_user_can_verify() {
    let store = test_store().await;
    let accounts = accounts(&store);

    accounts.create_user("alice", "secret1").await.unwrap();
    accounts.verify_credentials("alice", "secret1").await.unwrap();
}

#[tokio::test]
async fn test_password_is_stored_as_digest() {
    let store = test_store().await;
    accounts(&store)
        .create_user("alice", "secret1")
        .await
        .unwrap();

    let credential = DocumentCredentialStore::new(store)
        .get("alice")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(credential.password_digest, "secret1");
    assert!(credential.password_digest.starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_duplicate_user_is_rejected() {
    let store = test_store().await;
    let accounts = accounts(&store);
    accounts.create_user("alice", "secret1").await.unwrap();

    let err = accounts.create_user("alice", "other").await.unwrap_err();
    assert!(matches!(err, Error::User(UserError::UserExists { .. })));

    // The original password still works
    accounts.verify_credentials("alice", "secret1").await.unwrap();
    assert!(accounts.verify_credentials("alice", "other").await.is_err());
}

#[tokio::test]
async fn test_failures_do_not_reveal_usernames() {
    let store = test_store().await;
    let accounts = accounts(&store);
    accounts.create_user("alice", "secret1").await.unwrap();

    for (username, password) in [("alice", "wrong"), ("bob", "secret1"), ("", "")] {
        let err = accounts
            .verify_credentials(username, password)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::NotAuthenticated)));
        assert_eq!(err.to_string(), "not authorized");
    }
}
