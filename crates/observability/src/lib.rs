//! Process-wide logging setup for the inventrobil binaries.

/// Install JSON logging at `info` unless `RUST_LOG` says otherwise.
///
/// Later calls are no-ops.
pub fn init() {
    tracing::init("info");
}

pub mod tracing;
