//! Constants used throughout the devicehub library.
//!
//! Collection names and session defaults live here so the stores, the
//! session layer and the HTTP surface agree on them.

/// Collection holding device records, keyed by device id.
pub const DEVICES: &str = "devices";

/// Collection holding live sessions, keyed by token.
pub const SESSIONS: &str = "sessions";

/// Collection holding user credentials, keyed by username.
pub const USERS: &str = "users";

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_token";

/// Default session lifetime in seconds.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 120;

/// Longest accepted session lifetime in seconds (30 days).
pub const MAX_SESSION_TTL_SECS: i64 = 30 * 24 * 60 * 60;
