//! Tracing initialisation for the service binary.
//!
//! Spans and events are emitted throughout the crate with `tracing`; this
//! module wires them to stderr with an environment-controlled filter. The
//! `RUST_LOG` variable overrides the default level.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "repolens=info,tower_http=info";

/// Installs the global tracing subscriber.
///
/// Safe to call more than once; later calls are ignored, which keeps test
/// binaries that initialise telemetry per-case from tripping over each
/// other.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ignored = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
