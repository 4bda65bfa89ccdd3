//! Background poll task.
//!
//! Fetches a batch every interval and invokes the callback for each
//! interaction in the order the source yields them. Stopping cancels the
//! task and waits for it, so no callback is running once
//! [`Poller::stop`] returns.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};
use tracing::{debug, error, info, warn};

use oobwatch_core::Interaction;

use crate::error::ClientError;
use crate::session::InteractionCallback;

/// Something that can be asked for newly recorded interactions.
pub trait InteractionSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Vec<Interaction>, ClientError>> + Send;
}

/// Handle to a running poll task.
#[derive(Debug)]
pub struct Poller {
    cancel: CancellationToken,
    finished: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Spawn the poll task. The first fetch happens one `interval` after
    /// spawning. `interval` must be non-zero.
    pub fn spawn<S: InteractionSource>(
        source: Arc<S>,
        interval: Duration,
        callback: InteractionCallback,
    ) -> Self {
        let cancel = CancellationToken::new();
        let finished = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            source,
            interval,
            callback,
            cancel.clone(),
            finished.clone(),
        ));
        Self {
            cancel,
            finished,
            handle: Some(handle),
        }
    }

    /// Future resolving once the task has exited, for any reason.
    pub fn finished(&self) -> WaitForCancellationFutureOwned {
        self.finished.clone().cancelled_owned()
    }

    pub fn is_finished(&self) -> bool {
        self.finished.is_cancelled()
    }

    /// Cancel the task and wait for it to exit.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            warn!(error = %e, "Poll task terminated abnormally");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop<S: InteractionSource>(
    source: Arc<S>,
    interval: Duration,
    callback: InteractionCallback,
    cancel: CancellationToken,
    finished: CancellationToken,
) {
    let _finished = finished.drop_guard();
    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer.tick().await; // Skip first immediate tick

    let mut cycle: u64 = 0;
    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                info!("Poll task shutting down");
                return;
            }
            _ = timer.tick() => {}
        }
        cycle += 1;

        let result = tokio::select! {
            () = cancel.cancelled() => {
                info!(cycle, "Poll task shutting down mid-request");
                return;
            }
            result = source.fetch() => result,
        };

        match result {
            Ok(batch) => {
                debug!(cycle, count = batch.len(), "Poll cycle complete");
                for interaction in batch {
                    callback(interaction);
                }
            }
            Err(e) if e.is_fatal() => {
                error!(error = %e, cycle, "Polling stopped");
                return;
            }
            Err(e) => {
                warn!(error = %e, cycle, "Poll request failed");
            }
        }
    }
}
