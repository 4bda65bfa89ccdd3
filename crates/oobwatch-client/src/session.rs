//! The session interface consumed by the reporting side.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use oobwatch_core::Interaction;

use crate::error::ClientError;

/// Invoked once per delivered interaction, from the polling task.
pub type InteractionCallback = Arc<dyn Fn(Interaction) + Send + Sync>;

/// A registered session with a correlation service.
///
/// Lifecycle: create, hand out endpoints, [`start_polling`](Self::start_polling),
/// then [`stop_polling`](Self::stop_polling) and [`close`](Self::close).
pub trait Session: Send {
    /// A new endpoint identifier routed to this session.
    fn endpoint_url(&self) -> String;

    /// Start the background poll task. Fails if it is already running.
    fn start_polling(
        &mut self,
        interval: Duration,
        callback: InteractionCallback,
    ) -> Result<(), ClientError>;

    /// Resolves when the poll task exits on its own (fatal poll error).
    /// Never resolves if polling was not started.
    fn polling_finished(&self) -> impl Future<Output = ()> + Send + 'static;

    /// Stop the poll task and wait for any in-flight callback to return.
    fn stop_polling(&mut self) -> impl Future<Output = ()> + Send;

    /// Release the session on the service.
    fn close(self) -> impl Future<Output = Result<(), ClientError>> + Send;
}
