//! Logging setup
//!
//! The library only emits `tracing` events. Hosts that want them on stderr
//! call [`init`] once; `RUST_LOG` overrides the default filter.

use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber. Returns `false` if one was already set.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
