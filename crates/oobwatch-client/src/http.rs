//! HTTP session against the correlation service.
//!
//! Uses reqwest for the `register`, `poll` and `deregister` endpoints.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use oobwatch_core::Interaction;

use crate::correlation;
use crate::error::ClientError;
use crate::options::SessionOptions;
use crate::poller::{InteractionSource, Poller};
use crate::session::{InteractionCallback, Session};

/// Registration and deregistration body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct SessionKeys<'a> {
    correlation_id: &'a str,
    secret_key: &'a str,
}

/// Body of a `poll` response. Entries are JSON-encoded interactions.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PollResponse {
    #[serde(default)]
    data: Vec<String>,
    #[serde(default)]
    extra: Vec<String>,
}

impl PollResponse {
    /// Decode every entry, skipping (and logging) the ones that fail.
    pub(crate) fn into_interactions(self) -> Vec<Interaction> {
        self.data
            .into_iter()
            .chain(self.extra)
            .filter_map(|entry| match serde_json::from_str(&entry) {
                Ok(interaction) => Some(interaction),
                Err(e) => {
                    warn!(error = %e, "Skipping undecodable interaction");
                    None
                }
            })
            .collect()
    }
}

/// Low-level client bound to one correlation id.
#[derive(Debug)]
pub(crate) struct ServiceClient {
    http: reqwest::Client,
    base_url: String,
    domain: String,
    correlation_id: String,
    secret_key: String,
}

impl ServiceClient {
    pub(crate) fn new(options: &SessionOptions) -> Result<Self, ClientError> {
        let base_url = options.server_url.trim_end_matches('/').to_string();
        let parsed =
            Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "{base_url}: unsupported scheme {}",
                parsed.scheme()
            )));
        }
        let domain = parsed
            .host_str()
            .ok_or_else(|| ClientError::InvalidUrl(format!("{base_url}: missing host")))?
            .to_string();

        let mut headers = HeaderMap::new();
        if !options.token.is_empty() {
            let token_val = HeaderValue::from_str(&options.token)
                .map_err(|_| ClientError::InvalidToken)?;
            headers.insert(AUTHORIZATION, token_val);
        }

        // Ensure a TLS crypto provider is installed (reqwest uses rustls-no-provider).
        // The `Err` case just means it was already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url,
            domain,
            correlation_id: correlation::correlation_id(),
            secret_key: correlation::secret_key(),
        })
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn poll_url(&self) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.api_url("poll"))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("id", &self.correlation_id)
            .append_pair("secret", &self.secret_key);
        Ok(url)
    }

    fn keys(&self) -> SessionKeys<'_> {
        SessionKeys {
            correlation_id: &self.correlation_id,
            secret_key: &self.secret_key,
        }
    }

    /// Check HTTP response status, returning error for non-success codes.
    fn check_status(resp: &reqwest::Response) -> Result<(), ClientError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").into(),
            });
        }
        Ok(())
    }

    pub(crate) async fn register(&self) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.api_url("register"))
            .json(&self.keys())
            .send()
            .await?;
        Self::check_status(&resp)
    }

    pub(crate) async fn deregister(&self) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.api_url("deregister"))
            .json(&self.keys())
            .send()
            .await?;
        Self::check_status(&resp)
    }

    pub(crate) async fn poll(&self) -> Result<Vec<Interaction>, ClientError> {
        let resp = self.http.get(self.poll_url()?).send().await?;
        Self::check_status(&resp)?;
        let body: PollResponse = resp.json().await?;
        Ok(body.into_interactions())
    }
}

impl InteractionSource for ServiceClient {
    async fn fetch(&self) -> Result<Vec<Interaction>, ClientError> {
        self.poll().await
    }
}

/// Session registered with a correlation service over HTTP.
#[derive(Debug)]
pub struct HttpSession {
    service: Arc<ServiceClient>,
    persistent: bool,
    poller: Option<Poller>,
}

impl HttpSession {
    /// Register a new correlation id with the service.
    pub async fn connect(options: &SessionOptions) -> Result<Self, ClientError> {
        let service = ServiceClient::new(options)?;
        service.register().await?;
        info!(
            server = %service.base_url,
            correlation_id = %service.correlation_id,
            persistent = options.persistent,
            "Registered with correlation service"
        );
        Ok(Self {
            service: Arc::new(service),
            persistent: options.persistent,
            poller: None,
        })
    }

    pub fn correlation_id(&self) -> &str {
        &self.service.correlation_id
    }
}

impl Session for HttpSession {
    fn endpoint_url(&self) -> String {
        correlation::endpoint_url(&self.service.correlation_id, &self.service.domain)
    }

    fn start_polling(
        &mut self,
        interval: Duration,
        callback: InteractionCallback,
    ) -> Result<(), ClientError> {
        if self.poller.is_some() {
            return Err(ClientError::AlreadyPolling);
        }
        debug!(interval_secs = interval.as_secs(), "Starting poll task");
        self.poller = Some(Poller::spawn(Arc::clone(&self.service), interval, callback));
        Ok(())
    }

    fn polling_finished(&self) -> impl Future<Output = ()> + Send + 'static {
        let finished = self.poller.as_ref().map(Poller::finished);
        async move {
            match finished {
                Some(f) => f.await,
                None => std::future::pending().await,
            }
        }
    }

    async fn stop_polling(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop().await;
        }
    }

    async fn close(mut self) -> Result<(), ClientError> {
        self.stop_polling().await;
        if self.persistent {
            info!(correlation_id = %self.service.correlation_id, "Keeping persistent session registered");
            return Ok(());
        }
        self.service.deregister().await?;
        info!(correlation_id = %self.service.correlation_id, "Deregistered from correlation service");
        Ok(())
    }
}
