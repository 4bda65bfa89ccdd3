//! Startup wiring: endpoints, reporting callback, hand-off to shutdown.

use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use oobwatch_client::{ClientError, InteractionCallback, Session};
use oobwatch_core::{FilterConfig, OutputSink, Reporter};

use crate::shutdown::{ShutdownController, ShutdownReason};

/// Values fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    /// Number of endpoint URLs to request and display.
    pub endpoints: usize,
    pub poll_interval: Duration,
    pub filter: FilterConfig,
}

/// Request `count` endpoint URLs from the session and write them to `out`,
/// one per line after a header.
///
/// The lines are also mirrored to the log. A failed write is logged and does
/// not stop the run: the URLs are still returned.
pub fn announce_endpoints<S: Session>(
    session: &S,
    count: usize,
    out: &mut impl Write,
) -> Vec<String> {
    let header = format!("Listing {count} URL for OOB Testing");
    info!("{header}");
    let urls: Vec<String> = (0..count).map(|_| session.endpoint_url()).collect();
    for url in &urls {
        info!(%url, "Endpoint");
    }

    if let Err(e) = write_endpoints(out, &header, &urls) {
        warn!(error = %e, "Could not write endpoint URLs");
    }
    urls
}

fn write_endpoints(out: &mut impl Write, header: &str, urls: &[String]) -> io::Result<()> {
    writeln!(out, "{header}")?;
    for url in urls {
        writeln!(out, "{url}")?;
    }
    out.flush()
}

/// Build the polling callback: router, renderer and sink for each delivered
/// interaction.
pub fn reporting_callback(filter: FilterConfig, sink: Arc<OutputSink>) -> InteractionCallback {
    let reporter = Reporter::new(filter, sink);
    Arc::new(move |interaction| {
        reporter.report(&interaction);
    })
}

/// Announce endpoints, start polling and block until shutdown completes.
pub async fn run<S, F>(
    mut session: S,
    settings: &RunSettings,
    sink: Arc<OutputSink>,
    interrupt: F,
) -> Result<ShutdownReason, ClientError>
where
    S: Session,
    F: Future<Output = ()>,
{
    announce_endpoints(&session, settings.endpoints, &mut io::stderr());

    let callback = reporting_callback(settings.filter, Arc::clone(&sink));
    session.start_polling(settings.poll_interval, callback)?;
    info!(
        interval_secs = settings.poll_interval.as_secs(),
        mode = ?settings.filter.render_mode(),
        "Polling for interactions"
    );

    let mut controller = ShutdownController::new();
    Ok(controller.run(session, &sink, interrupt).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct NumberedSession {
        issued: AtomicUsize,
    }

    impl Session for NumberedSession {
        fn endpoint_url(&self) -> String {
            format!("c{}.oast.site", self.issued.fetch_add(1, Ordering::SeqCst))
        }

        fn start_polling(&mut self, _: Duration, _: InteractionCallback) -> Result<(), ClientError> {
            Ok(())
        }

        fn polling_finished(&self) -> impl Future<Output = ()> + Send + 'static {
            std::future::pending()
        }

        async fn stop_polling(&mut self) {}

        async fn close(self) -> Result<(), ClientError> {
            Ok(())
        }
    }

    /// Writer that rejects every write.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn endpoints_are_written_regardless_of_log_level() {
        let mut out = Vec::new();
        let urls = announce_endpoints(&NumberedSession::default(), 2, &mut out);

        assert_eq!(urls, ["c0.oast.site", "c1.oast.site"]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Listing 2 URL for OOB Testing\nc0.oast.site\nc1.oast.site\n"
        );
    }

    #[test]
    fn write_failure_still_returns_urls() {
        let urls = announce_endpoints(&NumberedSession::default(), 1, &mut Broken);
        assert_eq!(urls, ["c0.oast.site"]);
    }
}
