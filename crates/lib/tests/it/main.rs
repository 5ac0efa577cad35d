/*! Integration tests for devicehub.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - backend: DocumentStore behaviour shared by every backend, and persistence
 * - user: Account registration and credential checks
 * - session: The session lifecycle against a real store
 * - device: Upsert reconciliation and deletion
 * - service: The HTTP router, driven request by request
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("devicehub=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod backend;
mod device;
mod helpers;
mod user;
