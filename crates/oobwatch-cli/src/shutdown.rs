//! Interrupt-driven teardown of a running session.
//!
//! Polling is stopped (and in-flight callbacks drained) before the output
//! sink is closed, so no write is ever cut short by the file handle going
//! away.

use std::future::Future;

use tracing::{info, warn};

use oobwatch_client::Session;
use oobwatch_core::OutputSink;

/// Process exit status after any shutdown, including a clean interrupt.
pub const EXIT_STATUS: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    Running,
    Interrupted,
    Terminated,
}

/// Why the run loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// An interrupt signal arrived.
    Interrupted,
    /// The poll task exited on its own after a fatal error.
    PollingEnded,
}

#[derive(Debug)]
pub struct ShutdownController {
    state: ShutdownState,
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownController {
    pub const fn new() -> Self {
        Self {
            state: ShutdownState::Running,
        }
    }

    pub const fn state(&self) -> ShutdownState {
        self.state
    }

    /// Block until `interrupt` resolves or polling ends, then tear down.
    ///
    /// Only the first trigger is observed; teardown runs exactly once.
    pub async fn run<S, F>(
        &mut self,
        mut session: S,
        sink: &OutputSink,
        interrupt: F,
    ) -> ShutdownReason
    where
        S: Session,
        F: Future<Output = ()>,
    {
        let finished = session.polling_finished();
        let reason = tokio::select! {
            () = interrupt => {
                info!("Received interrupt, shutting down");
                ShutdownReason::Interrupted
            }
            () = finished => {
                warn!("Polling stopped, shutting down");
                ShutdownReason::PollingEnded
            }
        };
        self.state = ShutdownState::Interrupted;

        session.stop_polling().await;
        sink.close();
        if let Err(e) = session.close().await {
            warn!(error = %e, "Could not close session");
        }

        self.state = ShutdownState::Terminated;
        reason
    }
}

/// Resolves on Ctrl+C, or on SIGTERM on unix.
pub async fn interrupt_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Could not listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C"),
        () = terminate => info!("Received SIGTERM"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use tokio::sync::Notify;

    use oobwatch_client::{ClientError, InteractionCallback};

    use super::*;

    #[derive(Default)]
    struct Calls {
        stopped: AtomicBool,
        closed: AtomicBool,
        sink_closed_before_stop: AtomicBool,
        sink_closed_before_close: AtomicBool,
    }

    struct FakeSession {
        calls: Arc<Calls>,
        sink: Arc<OutputSink>,
        finished: Arc<Notify>,
        close_fails: bool,
    }

    impl Session for FakeSession {
        fn endpoint_url(&self) -> String {
            "abc.oast.site".into()
        }

        fn start_polling(&mut self, _: Duration, _: InteractionCallback) -> Result<(), ClientError> {
            Ok(())
        }

        fn polling_finished(&self) -> impl Future<Output = ()> + Send + 'static {
            let finished = Arc::clone(&self.finished);
            async move { finished.notified().await }
        }

        async fn stop_polling(&mut self) {
            self.calls
                .sink_closed_before_stop
                .store(self.sink.is_closed(), Ordering::SeqCst);
            self.calls.stopped.store(true, Ordering::SeqCst);
        }

        async fn close(self) -> Result<(), ClientError> {
            self.calls
                .sink_closed_before_close
                .store(self.sink.is_closed(), Ordering::SeqCst);
            self.calls.closed.store(true, Ordering::SeqCst);
            if self.close_fails {
                return Err(ClientError::Unauthorized);
            }
            Ok(())
        }
    }

    fn fixture(close_fails: bool) -> (FakeSession, Arc<Calls>, Arc<OutputSink>) {
        let sink = Arc::new(OutputSink::with_console(Box::new(io::sink()), None).unwrap());
        let calls = Arc::new(Calls::default());
        let session = FakeSession {
            calls: Arc::clone(&calls),
            sink: Arc::clone(&sink),
            finished: Arc::new(Notify::new()),
            close_fails,
        };
        (session, calls, sink)
    }

    #[test]
    fn starts_running() {
        assert_eq!(ShutdownController::new().state(), ShutdownState::Running);
    }

    #[tokio::test]
    async fn interrupt_runs_teardown_in_order() {
        let (session, calls, sink) = fixture(false);
        let mut controller = ShutdownController::new();

        let reason = controller.run(session, &sink, async {}).await;

        assert_eq!(reason, ShutdownReason::Interrupted);
        assert_eq!(controller.state(), ShutdownState::Terminated);
        assert!(calls.stopped.load(Ordering::SeqCst));
        assert!(calls.closed.load(Ordering::SeqCst));
        assert!(!calls.sink_closed_before_stop.load(Ordering::SeqCst));
        assert!(calls.sink_closed_before_close.load(Ordering::SeqCst));
        assert!(sink.is_closed());
    }

    #[tokio::test]
    async fn polling_end_triggers_teardown() {
        let (session, calls, sink) = fixture(false);
        session.finished.notify_one();
        let mut controller = ShutdownController::new();

        let reason = controller.run(session, &sink, std::future::pending()).await;

        assert_eq!(reason, ShutdownReason::PollingEnded);
        assert_eq!(controller.state(), ShutdownState::Terminated);
        assert!(calls.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn close_failure_still_terminates() {
        let (session, calls, sink) = fixture(true);
        let mut controller = ShutdownController::new();

        let reason = controller.run(session, &sink, async {}).await;

        assert_eq!(reason, ShutdownReason::Interrupted);
        assert_eq!(controller.state(), ShutdownState::Terminated);
        assert!(calls.closed.load(Ordering::SeqCst));
    }
}
