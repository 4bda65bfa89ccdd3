//! Reporting pipeline: router, renderer and sink wired together.
//!
//! A [`Reporter`] is stateless across interactions and safe to share between
//! concurrent polling callbacks.

use std::sync::Arc;

use tracing::{debug, error};

use crate::filter::{FilterConfig, RenderMode};
use crate::interaction::{Interaction, ProtocolKind};
use crate::render::{render_json, render_text};
use crate::router::{Route, route};
use crate::sink::OutputSink;

/// What happened to a reported interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// One unit was handed to the sink.
    Emitted,
    /// Hidden by a protocol-only filter (text mode).
    Suppressed(ProtocolKind),
    /// Unknown protocol tag, dropped (text mode).
    Unrecognized(String),
    /// Structured rendering failed; nothing was emitted.
    SerializationFailed,
}

#[derive(Debug, Clone)]
pub struct Reporter {
    config: FilterConfig,
    sink: Arc<OutputSink>,
}

impl Reporter {
    pub const fn new(config: FilterConfig, sink: Arc<OutputSink>) -> Self {
        Self { config, sink }
    }

    /// Route, render and emit a single interaction.
    pub fn report(&self, interaction: &Interaction) -> Outcome {
        match self.config.render_mode() {
            RenderMode::Structured => match render_json(interaction) {
                Ok(record) => {
                    self.sink.emit(&record);
                    Outcome::Emitted
                }
                Err(e) => {
                    error!(error = %e, full_id = %interaction.full_id, "Could not marshal json output");
                    Outcome::SerializationFailed
                }
            },
            RenderMode::Text => match route(interaction, &self.config) {
                Route::Display(kind) => {
                    self.sink
                        .emit(&render_text(interaction, kind, self.config.verbose));
                    Outcome::Emitted
                }
                Route::Suppressed(kind) => {
                    debug!(?kind, full_id = %interaction.full_id, "Interaction filtered");
                    Outcome::Suppressed(kind)
                }
                Route::Unrecognized(tag) => {
                    debug!(protocol = %tag, "Dropping interaction with unhandled protocol");
                    Outcome::Unrecognized(tag)
                }
            },
        }
    }
}
