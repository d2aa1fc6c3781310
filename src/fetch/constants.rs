//! Constants for the fetch module (timeouts).

/// Default per-request timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Connect timeout ceiling in seconds. The effective connect timeout is the
/// smaller of this and the per-request timeout.
pub const CONNECT_TIMEOUT_SECS: u64 = 5;
