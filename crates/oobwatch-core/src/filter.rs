//! Filter policy and render mode, fixed once at startup.

/// How interactions are rendered for the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Human-readable summary lines, subject to the protocol filters.
    Text,
    /// One indented JSON record per interaction; filters are bypassed.
    Structured,
}

/// Reporting configuration. Built once from the command line and passed by
/// value into the router and renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct FilterConfig {
    /// Only display DNS interactions (text mode).
    pub dns_only: bool,
    /// Only display HTTP interactions (text mode).
    pub http_only: bool,
    /// Only display SMTP interactions (text mode).
    pub smtp_only: bool,
    /// Append raw request/response blocks (text mode).
    pub verbose: bool,
    /// Render structured records instead of text.
    pub json: bool,
}

impl FilterConfig {
    /// True when no protocol-only filter is set.
    pub const fn no_filter(&self) -> bool {
        !self.dns_only && !self.http_only && !self.smtp_only
    }

    pub const fn render_mode(&self) -> RenderMode {
        if self.json {
            RenderMode::Structured
        } else {
            RenderMode::Text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_filter() {
        let cfg = FilterConfig::default();
        assert!(cfg.no_filter());
        assert_eq!(cfg.render_mode(), RenderMode::Text);
    }

    #[test]
    fn any_protocol_flag_disables_no_filter() {
        for cfg in [
            FilterConfig {
                dns_only: true,
                ..Default::default()
            },
            FilterConfig {
                http_only: true,
                ..Default::default()
            },
            FilterConfig {
                smtp_only: true,
                ..Default::default()
            },
        ] {
            assert!(!cfg.no_filter(), "{cfg:?}");
        }
    }

    #[test]
    fn verbose_and_json_do_not_count_as_filters() {
        let cfg = FilterConfig {
            verbose: true,
            json: true,
            ..Default::default()
        };
        assert!(cfg.no_filter());
        assert_eq!(cfg.render_mode(), RenderMode::Structured);
    }
}
