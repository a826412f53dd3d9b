//! `crewdeck-observability` — process-wide tracing/logging setup.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// The default filter keeps the session manager chatty (refresh races and
/// store write-throughs log at debug) and the HTTP stack quiet; set
/// `RUST_LOG` to override. Safe to call multiple times (subsequent calls
/// are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,crewdeck_session=debug,hyper=warn,reqwest=warn")
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
