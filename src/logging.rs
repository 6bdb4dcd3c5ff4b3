//! Logging setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt::Subscriber::builder().with_env_filter(env).try_init();
}
