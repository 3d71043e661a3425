//! Structured logging setup.
//!
//! The table library logs through the `log` facade; the subscriber installed
//! here picks those records up alongside the client's own tracing events.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging, configurable via the RUST_LOG env var
///
/// Logs go to stderr so they do not interleave with the table on stdout.
///
/// # Example
///
/// ```no_run
/// use bj_client::logging;
///
/// logging::init();
/// tracing::info!("Client starting");
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("warn,bj_client=info,blackjack_table=info,reqwest=warn,hyper=warn")
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::debug!("Logging initialized");
}
