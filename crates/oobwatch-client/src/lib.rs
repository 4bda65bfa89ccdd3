//! `oobwatch` correlation service client.
//!
//! Registers a correlation id with the remote service, hands out endpoint
//! identifiers that route to it, and polls the service for recorded
//! interactions on a background task.

pub mod correlation;
pub mod error;
mod http;
pub mod options;
pub mod poller;
pub mod session;

pub use error::ClientError;
pub use http::HttpSession;
pub use options::SessionOptions;
pub use poller::{InteractionSource, Poller};
pub use session::{InteractionCallback, Session};
