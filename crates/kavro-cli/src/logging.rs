use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,rdkafka=warn";

/// Install the global subscriber. Logs go to stderr so they never mix with
/// prompts or printed records on stdout. `RUST_LOG` overrides the filter.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
