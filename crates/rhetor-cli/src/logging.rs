use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global subscriber. Filtering follows `RUST_LOG`, defaulting
/// to `info`; output goes to stderr so stdout stays valid JSON.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}
