//! Diagnostic logging setup.
//!
//! Rendered interactions are the program's product and go to stdout through
//! [`OutputSink`](crate::OutputSink); with `--json` that stream is one record
//! after another and is meant to be piped into other tools. Diagnostics must
//! never interleave with it, so every log line goes to stderr.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter` (e.g. `"oobwatch=info"`).
/// `log_json` switches diagnostics to one JSON object per line.
pub fn init_tracing(default_filter: &str, log_json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let diagnostics = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    let registry = tracing_subscriber::registry().with(filter);
    if log_json {
        registry.with(diagnostics.json()).init();
    } else {
        registry.with(diagnostics).init();
    }
}
