//! Interaction rendering: human-readable summaries and structured records.

use std::fmt::Write;

use serde::Serialize;

use crate::interaction::{Interaction, ProtocolKind};

/// Fixed-width timestamp layout used in text summaries.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render the text block for a displayed interaction.
///
/// The first line is the one-line summary; with `verbose` the raw payloads
/// follow in labelled sections.
pub fn render_text(interaction: &Interaction, kind: ProtocolKind, verbose: bool) -> String {
    let at = interaction.timestamp.format(TIMESTAMP_FORMAT);
    let mut out = match kind {
        ProtocolKind::Dns => format!(
            "[{}] Received DNS interaction ({}) from {} at {at}",
            interaction.full_id, interaction.q_type, interaction.remote_address
        ),
        ProtocolKind::Http => format!(
            "[{}] Received HTTP interaction from {} at {at}",
            interaction.full_id, interaction.remote_address
        ),
        ProtocolKind::Smtp => format!(
            "[{}] Received SMTP interaction from {} at {at}",
            interaction.full_id, interaction.remote_address
        ),
        ProtocolKind::Responder | ProtocolKind::Smb => {
            format!("Received Responder/Smb interaction at {at}")
        }
    };
    if verbose {
        out.push('\n');
        for section in sections(interaction, kind) {
            section.push_to(&mut out);
        }
    }
    out
}

/// Rule width of the single payload block of SMTP and Responder/SMB output.
const PAYLOAD_RULE_WIDTH: usize = 12;

/// One labelled raw payload block of verbose output.
struct Section<'a> {
    label: &'static str,
    rule_width: usize,
    body: &'a str,
}

impl<'a> Section<'a> {
    /// Block whose rule is as wide as its label.
    const fn fitted(label: &'static str, body: &'a str) -> Self {
        Self {
            label,
            rule_width: label.len(),
            body,
        }
    }

    const fn payload(label: &'static str, body: &'a str) -> Self {
        Self {
            label,
            rule_width: PAYLOAD_RULE_WIDTH,
            body,
        }
    }

    fn push_to(&self, out: &mut String) {
        let rule = "-".repeat(self.rule_width);
        // Writing into a String cannot fail.
        let _ = write!(out, "{rule}\n{}\n{rule}\n\n{}\n\n", self.label, self.body);
    }
}

fn sections(interaction: &Interaction, kind: ProtocolKind) -> Vec<Section<'_>> {
    let request = interaction.raw_request.as_str();
    let response = interaction.raw_response.as_str();
    match kind {
        ProtocolKind::Dns => vec![
            Section::fitted("DNS Request", request),
            Section::fitted("DNS Response", response),
        ],
        ProtocolKind::Http => vec![
            Section::fitted("HTTP Request", request),
            Section::fitted("HTTP Response", response),
        ],
        ProtocolKind::Smtp => vec![Section::payload("SMTP Interaction", request)],
        ProtocolKind::Responder | ProtocolKind::Smb => {
            vec![Section::payload("Responder/SMB Interaction", request)]
        }
    }
}

/// Render the full interaction as a tab-indented JSON object.
pub fn render_json(interaction: &Interaction) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    interaction.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}
