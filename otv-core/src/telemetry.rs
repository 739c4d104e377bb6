//! Telemetry Initialization
//!
//! Tracing subscriber setup shared by the service binary and the
//! integration tests. Log levels follow the usual conventions:
//! ERROR for unrecoverable failures, WARN for degraded operation
//! (chain RPC retries, skipped candidates), INFO for job start/end
//! and significant state changes, DEBUG for per-candidate flow.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// The filter is taken from `RUST_LOG` when set, falling back to the
/// given default directive. Calling this twice is a no-op so tests
/// can initialize freely.
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init("info");
        init("debug");
    }
}
