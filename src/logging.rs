//! Logging configuration for the command-line front end.
//!
//! Events go to stderr so that stdout stays clean for incident output
//! (including `--json`, which is meant to be piped).

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log filter if `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "nw_incidents=info,warn";

/// Installs the global tracing subscriber.
///
/// Configure verbosity via `RUST_LOG`, e.g. `RUST_LOG=nw_incidents=debug`
/// to see every request the library makes.
pub fn init() -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(filter)
        .try_init()
}
