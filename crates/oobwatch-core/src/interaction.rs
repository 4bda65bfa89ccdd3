//! Interaction records delivered by the correlation service.
//!
//! An [`Interaction`] is handed once to the reporting pipeline and never
//! retained. Field names on the wire are kebab-case and are preserved
//! verbatim when an interaction is rendered in structured mode.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol tag of an interaction.
///
/// Unknown tags are kept as [`Protocol::Other`] so they survive a
/// deserialize/serialize cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Protocol {
    Dns,
    Http,
    Smtp,
    Responder,
    Smb,
    Other(String),
}

/// The protocols the reporting pipeline knows how to render as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolKind {
    Dns,
    Http,
    Smtp,
    Responder,
    Smb,
}

impl Protocol {
    /// Wire tag, exactly as sent by the service.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Dns => "dns",
            Self::Http => "http",
            Self::Smtp => "smtp",
            Self::Responder => "responder",
            Self::Smb => "smb",
            Self::Other(tag) => tag,
        }
    }

    /// Recognized kind, or `None` for a valid-but-unhandled tag.
    pub const fn kind(&self) -> Option<ProtocolKind> {
        match self {
            Self::Dns => Some(ProtocolKind::Dns),
            Self::Http => Some(ProtocolKind::Http),
            Self::Smtp => Some(ProtocolKind::Smtp),
            Self::Responder => Some(ProtocolKind::Responder),
            Self::Smb => Some(ProtocolKind::Smb),
            Self::Other(_) => None,
        }
    }
}

impl From<String> for Protocol {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "dns" => Self::Dns,
            "http" => Self::Http,
            "smtp" => Self::Smtp,
            "responder" => Self::Responder,
            "smb" => Self::Smb,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for Protocol {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<Protocol> for String {
    fn from(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded out-of-band interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Interaction {
    /// Protocol the interaction arrived over.
    pub protocol: Protocol,
    /// Correlation prefix of the endpoint that was contacted.
    #[serde(default)]
    pub unique_id: String,
    /// Full identifier of the endpoint instance that was contacted.
    #[serde(default)]
    pub full_id: String,
    /// DNS query type; empty for every other protocol.
    #[serde(default)]
    pub q_type: String,
    #[serde(default)]
    pub raw_request: String,
    /// Absent for protocols without a response (smtp, responder, smb).
    #[serde(default)]
    pub raw_response: String,
    #[serde(default)]
    pub remote_address: String,
    /// Capture time assigned by the service, in the offset it was sent with.
    pub timestamp: DateTime<FixedOffset>,
    /// Wire fields without a dedicated member (e.g. `smtp-from`), carried
    /// through to structured output unchanged.
    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_map_to_kinds() {
        assert_eq!(Protocol::from("dns").kind(), Some(ProtocolKind::Dns));
        assert_eq!(Protocol::from("http").kind(), Some(ProtocolKind::Http));
        assert_eq!(Protocol::from("smtp").kind(), Some(ProtocolKind::Smtp));
        assert_eq!(
            Protocol::from("responder").kind(),
            Some(ProtocolKind::Responder)
        );
        assert_eq!(Protocol::from("smb").kind(), Some(ProtocolKind::Smb));
    }

    #[test]
    fn unknown_tag_is_kept_verbatim() {
        let p = Protocol::from("ftp");
        assert_eq!(p, Protocol::Other("ftp".into()));
        assert!(p.kind().is_none());
        assert_eq!(String::from(p), "ftp");
    }

    #[test]
    fn tags_are_case_sensitive() {
        assert_eq!(Protocol::from("DNS"), Protocol::Other("DNS".into()));
    }

    #[test]
    fn deserializes_service_record() {
        let json = r#"{
            "protocol": "dns",
            "unique-id": "c58bduhe008dovpvhvugcfemp9yyyyyyn",
            "full-id": "c58bduhe008dovpvhvugcfemp9yyyyyyn.oast.site",
            "q-type": "A",
            "raw-request": "req",
            "raw-response": "resp",
            "remote-address": "172.253.226.100",
            "timestamp": "2024-01-02T03:04:05Z"
        }"#;
        let i: Interaction = serde_json::from_str(json).unwrap();
        assert_eq!(i.protocol, Protocol::Dns);
        assert_eq!(i.q_type, "A");
        assert_eq!(i.remote_address, "172.253.226.100");
        assert_eq!(i.timestamp.to_rfc3339(), "2024-01-02T03:04:05+00:00");
    }

    #[test]
    fn missing_response_defaults_to_empty() {
        let json = r#"{
            "protocol": "smtp",
            "full-id": "abc.oast.site",
            "raw-request": "MAIL FROM:<a@b>",
            "remote-address": "1.2.3.4",
            "timestamp": "2024-01-02T03:04:05Z"
        }"#;
        let i: Interaction = serde_json::from_str(json).unwrap();
        assert_eq!(i.protocol, Protocol::Smtp);
        assert!(i.raw_response.is_empty());
        assert!(i.q_type.is_empty());
    }

    #[test]
    fn serializes_every_field_with_wire_names() {
        let i = fixtures::interaction("ftp");
        let value = serde_json::to_value(&i).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
            "protocol",
            "unique-id",
            "full-id",
            "q-type",
            "raw-request",
            "raw-response",
            "remote-address",
            "timestamp",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj["protocol"], "ftp");
    }

    #[test]
    fn keeps_offset_and_unknown_fields() {
        let json = r#"{
            "protocol": "smtp",
            "unique-id": "abc",
            "full-id": "abc.oast.site",
            "raw-request": "MAIL FROM:<a@b>",
            "remote-address": "1.2.3.4",
            "timestamp": "2024-01-02T03:04:05+02:00",
            "smtp-from": "a@b"
        }"#;
        let i: Interaction = serde_json::from_str(json).unwrap();
        assert_eq!(i.timestamp.to_rfc3339(), "2024-01-02T03:04:05+02:00");
        assert_eq!(i.extra_fields["smtp-from"], "a@b");
        assert_eq!(i.extra_fields.len(), 1);

        let value = serde_json::to_value(&i).unwrap();
        assert_eq!(value["timestamp"], "2024-01-02T03:04:05+02:00");
        assert_eq!(value["smtp-from"], "a@b");
        let back: Interaction = serde_json::from_value(value).unwrap();
        assert_eq!(back, i);
    }
}
