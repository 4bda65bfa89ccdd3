//! Session creation options.

/// Default public correlation service.
pub const DEFAULT_SERVER_URL: &str = "https://interact.sh";

/// Options for [`HttpSession::connect`](crate::HttpSession::connect).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Correlation service base URL.
    pub server_url: String,
    /// Keep the registration alive on the service after the session closes.
    pub persistent: bool,
    /// Authentication token; empty when the service is open.
    pub token: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            persistent: false,
            token: String::new(),
        }
    }
}
