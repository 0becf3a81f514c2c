//! Logging initialization.
//!
//! Controlled by `RUST_LOG` (standard `tracing-subscriber` env-filter
//! syntax). With no override, only warnings and errors reach stderr — a
//! clean run is silent. Pass `RUST_LOG=triway=debug` to see per-stage
//! diagnostics: provider invocation, hunk counts, block classification
//! counts, and renderer dispatch.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Safe to call once at process
/// start; subsequent calls are a no-op (`set_global_default` failures are
/// swallowed, matching a CLI's "logging is best-effort" posture).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
