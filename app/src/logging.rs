use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` picks the level; the default is
/// `warn` so the JSON on stdout stays the only normal output.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
