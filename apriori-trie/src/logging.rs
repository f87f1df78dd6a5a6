//! Tracing initialization for the `apriori` binary.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

pub const LOG_ENV: &str = "APRIORI_LOG";

/// Installs the global subscriber.
///
/// `APRIORI_LOG` takes precedence when set and valid; otherwise progress
/// messages are shown at `info`, or only warnings when `quiet`.
pub fn init_tracing(quiet: bool) {
    INIT.call_once(|| {
        let default_filter = if quiet { "warn" } else { "apriori_trie=info,apriori=info" };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}

/// Runs `f` with a temporary stderr subscriber showing warnings only.
///
/// Used while the configuration that decides the real filter is loaded.
pub fn with_startup_logging<T>(f: impl FnOnce() -> T) -> T {
    let subscriber = fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}
