//! Logging initialization for the ledgerfx binary

use tracing_subscriber::{
    fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Build the event filter from `RUST_LOG` directives, if any.
///
/// Without usable directives the crate logs at warn, or at debug when
/// `verbose` is set.
fn build_filter(verbose: bool, directives: Option<&str>) -> EnvFilter {
    let fallback = if verbose {
        "ledgerfx=debug"
    } else {
        "ledgerfx=warn"
    };

    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` replaces the default filter when it is set.
pub fn init_logging(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(verbose, directives.as_deref());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .with(filter)
        .init();
}
