use std::sync::Arc;

use devicehub::{
    FixedClock,
    backend::{DocumentStore, database::InMemory},
    device::Device,
    session::{DocumentSessionStore, SessionManager},
    user::{AccountService, DocumentCredentialStore},
};

/// Creates a test store based on TEST_BACKEND env var.
///
/// Supported values:
/// - "inmemory" or unset: InMemory store (default)
/// - "sqlite": SQLite in-memory database (requires `sqlite` feature)
///
/// Every call returns an isolated store.
///
/// # Panics
/// Panics if TEST_BACKEND=sqlite but the `sqlite` feature is not enabled.
///
/// # Example
/// ```bash
/// # Run tests with InMemory (default)
/// cargo test
///
/// # Run tests with SQLite
/// TEST_BACKEND=sqlite cargo test --features sqlite
/// ```
pub async fn test_store() -> Arc<dyn DocumentStore> {
    match std::env::var("TEST_BACKEND").as_deref() {
        Ok("sqlite") => {
            #[cfg(feature = "sqlite")]
            {
                use devicehub::backend::database::SqlxBackend;
                Arc::new(
                    SqlxBackend::sqlite_in_memory()
                        .await
                        .expect("Failed to create SQLite backend"),
                )
            }
            #[cfg(not(feature = "sqlite"))]
            {
                panic!("TEST_BACKEND=sqlite requires the 'sqlite' feature to be enabled")
            }
        }
        Ok("inmemory") | Ok("") | Err(_) => Arc::new(InMemory::new()),
        Ok(other) => {
            panic!("Unknown TEST_BACKEND value: {other}. Supported: inmemory, sqlite")
        }
    }
}

/// Account service over the given store.
pub fn accounts(store: &Arc<dyn DocumentStore>) -> AccountService {
    AccountService::new(Arc::new(DocumentCredentialStore::new(store.clone())))
}

/// Session manager with the default TTL and a [`FixedClock`], plus a
/// registered `alice`/`secret1` account.
pub async fn test_sessions() -> (SessionManager, Arc<FixedClock>) {
    let store = test_store().await;
    let accounts = accounts(&store);
    accounts
        .create_user("alice", "secret1")
        .await
        .expect("Failed to create user");

    let clock = Arc::new(FixedClock::default());
    let manager = SessionManager::new(
        Arc::new(DocumentSessionStore::new(store)),
        accounts,
        clock.clone(),
        SessionManager::default_ttl(),
    );
    (manager, clock)
}

/// A fully populated device.
pub fn sample_device(id: &str, name: &str) -> Device {
    Device {
        id: id.to_string(),
        name: name.to_string(),
        device_type_id: "PLC-1500".to_string(),
        failsafe: true,
        temp_min: -25,
        temp_max: 60,
        installation_position: "horizontal".to_string(),
        insert_into_19_inch_cabinet: true,
        motion_enable: false,
        siplus_catalog: true,
        simatic_catalog: false,
        rotation_axis_number: 2,
        position_axis_number: 4,
        advanced_environmental_conditions: Some(true),
        terminal_element: None,
    }
}
