//! `oobwatch` Core Library
//!
//! Interaction reporting pipeline shared by the `oobwatch` components:
//! - Interaction data model and protocol classification
//! - Protocol filter policy and routing
//! - Text and structured rendering
//! - Output sink duplicating every rendered unit to console and file
//! - Common error types

pub mod error;
pub mod filter;
pub mod interaction;
pub mod render;
pub mod reporter;
pub mod router;
pub mod sink;
pub mod tracing_init;

pub use error::{Error, Result};
pub use filter::{FilterConfig, RenderMode};
pub use interaction::{Interaction, Protocol, ProtocolKind};
pub use reporter::{Outcome, Reporter};
pub use router::{Route, route};
pub use sink::OutputSink;
