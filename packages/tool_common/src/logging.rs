use tracing_subscriber::EnvFilter;

/// Install the log subscriber. Logs go to stderr so stdout stays free for
/// the tools' reports. Verbosity comes from `RUST_LOG` and
/// defaults to `info`. Calling this again after a subscriber is installed
/// does nothing.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
