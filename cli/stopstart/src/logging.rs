//! Logging initialization.
//!
//! Logs go to stderr so they never interleave with rendered output on
//! stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "STOPSTART_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. `json` selects structured output.
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| DEFAULT_FILTER.into());

    let layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
