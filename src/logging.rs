use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber used by the binaries.
///
/// `log` records from the library are forwarded to the subscriber. The filter
/// comes from `RUST_LOG` and defaults to `info`. Calling this twice is harmless.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();
}
