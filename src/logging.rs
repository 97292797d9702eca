//! Subscriber setup shared by the command-line tools.

use tracing_subscriber::EnvFilter;

const FALLBACK_LEVEL: &str = "warn";

/// Filter for a `--log-level` value. Anything unparseable falls back to warn.
fn level_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

/// Install a stderr fmt subscriber. `RUST_LOG` wins over `log_level` when set.
pub fn init(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Logging was already initialized");
    }
}
