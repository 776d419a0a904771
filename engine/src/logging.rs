//! Logging setup
//!
//! Console logging through `tracing-subscriber`. The filter comes from
//! `RUST_LOG`, falling back to the level passed in.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber, logging to stderr.
///
/// Returns `false` if a subscriber was already installed (tests, or a host
/// that set up its own).
pub fn init(default_level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init()
        .is_ok()
}
