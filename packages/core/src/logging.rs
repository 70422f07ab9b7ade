use tracing_subscriber::{fmt, EnvFilter};

/// Initialize structured logging for the binary.
///
/// Logs go to stderr so stdout carries only the JSON state output.
/// Must be called once at startup (in main.rs).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("baselime_provider=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Logging initialized");
}
