use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber. Honors `RUST_LOG`, defaulting to `info`.
///
/// Log lines go to stderr; stdout carries the sample tee.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
