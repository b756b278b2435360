//! Tracing setup.

use tracing_subscriber::EnvFilter;

/// Installs a JSON `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`. Returns `false` if a global subscriber already exists.
pub fn init_tracing(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .json()
        .try_init()
        .is_ok()
}
