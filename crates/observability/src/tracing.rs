//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Install the JSON subscriber for the process.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies (e.g.
/// `"info"` or `"inventrobil_infra=debug,info"`). Returns `false` when a
/// subscriber was already installed, in which case nothing changes.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Targets stay on so store and storage logs can be filtered per crate.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_current_span(false)
        .try_init()
        .is_ok()
}
