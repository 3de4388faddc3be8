//! Diagnostics via `tracing`.
//!
//! Logs go to stderr and are controlled by `RUST_LOG`; command output
//! (records, history) stays on stdout. The audit trail in the ledger is
//! separate and always written.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`, defaults to `warn`.
///
/// # Example
/// ```bash
/// RUST_LOG=vehicle_ledger=debug vlm demo
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // try_init: tests and embedding binaries may have installed one already
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
