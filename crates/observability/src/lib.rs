//! Tracing/logging setup shared by binaries and test harnesses.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process with the default `info` filter.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with_default_filter("info");
}

/// Initialize tracing/logging with an explicit fallback filter, still
/// overridable via `RUST_LOG`.
pub fn init_with_default_filter(default: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default.to_string()));

    // JSON logs + timestamps, configurable via RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
