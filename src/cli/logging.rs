//! Tracing setup for the CLI

use tracing_subscriber::{EnvFilter, fmt};

/// Install a stderr subscriber
///
/// `RUST_LOG` wins when set; otherwise the level is `info` with `verbose`
/// and `warn` without. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
