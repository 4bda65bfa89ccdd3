//! Text-mode routing: decides whether an interaction is displayed under the
//! active protocol filters.
//!
//! Only consulted in [`RenderMode::Text`](crate::RenderMode::Text); structured
//! output renders every interaction.

use crate::filter::FilterConfig;
use crate::interaction::{Interaction, ProtocolKind};

/// Routing decision for a single interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Render it.
    Display(ProtocolKind),
    /// Recognized protocol, hidden by a protocol-only filter.
    Suppressed(ProtocolKind),
    /// Tag the pipeline has no text template for. Carries the raw tag.
    Unrecognized(String),
}

/// Classify `interaction` against `config`.
///
/// Responder and SMB interactions have no opt-in flag of their own and are
/// only shown when no protocol filter is set.
pub fn route(interaction: &Interaction, config: &FilterConfig) -> Route {
    let Some(kind) = interaction.protocol.kind() else {
        return Route::Unrecognized(interaction.protocol.to_string());
    };
    let shown = config.no_filter()
        || match kind {
            ProtocolKind::Dns => config.dns_only,
            ProtocolKind::Http => config.http_only,
            ProtocolKind::Smtp => config.smtp_only,
            ProtocolKind::Responder | ProtocolKind::Smb => false,
        };
    if shown {
        Route::Display(kind)
    } else {
        Route::Suppressed(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::fixtures::interaction;

    const KNOWN: [&str; 5] = ["dns", "http", "smtp", "responder", "smb"];

    fn only(tag: &str) -> FilterConfig {
        FilterConfig {
            dns_only: tag == "dns",
            http_only: tag == "http",
            smtp_only: tag == "smtp",
            ..Default::default()
        }
    }

    #[test]
    fn no_filter_displays_every_known_protocol() {
        let cfg = FilterConfig::default();
        for tag in KNOWN {
            let r = route(&interaction(tag), &cfg);
            assert!(matches!(r, Route::Display(_)), "{tag}: {r:?}");
        }
    }

    #[test]
    fn single_filter_suppresses_all_other_protocols() {
        for selected in ["dns", "http", "smtp"] {
            let cfg = only(selected);
            for tag in KNOWN {
                let r = route(&interaction(tag), &cfg);
                if tag == selected {
                    assert!(matches!(r, Route::Display(_)), "{selected}/{tag}: {r:?}");
                } else {
                    assert!(matches!(r, Route::Suppressed(_)), "{selected}/{tag}: {r:?}");
                }
            }
        }
    }

    #[test]
    fn responder_and_smb_have_no_opt_in() {
        let cfg = FilterConfig {
            dns_only: true,
            http_only: true,
            smtp_only: true,
            ..Default::default()
        };
        assert_eq!(
            route(&interaction("responder"), &cfg),
            Route::Suppressed(ProtocolKind::Responder)
        );
        assert_eq!(
            route(&interaction("smb"), &cfg),
            Route::Suppressed(ProtocolKind::Smb)
        );
    }

    #[test]
    fn multiple_filters_combine() {
        let cfg = FilterConfig {
            dns_only: true,
            smtp_only: true,
            ..Default::default()
        };
        assert_eq!(
            route(&interaction("dns"), &cfg),
            Route::Display(ProtocolKind::Dns)
        );
        assert_eq!(
            route(&interaction("smtp"), &cfg),
            Route::Display(ProtocolKind::Smtp)
        );
        assert_eq!(
            route(&interaction("http"), &cfg),
            Route::Suppressed(ProtocolKind::Http)
        );
    }

    #[test]
    fn unknown_protocol_is_unrecognized() {
        assert_eq!(
            route(&interaction("ftp"), &FilterConfig::default()),
            Route::Unrecognized("ftp".into())
        );
    }
}
