//! Command-line flags.
//!
//! Every flag can also be set through an `OOBWATCH_*` environment variable.
//! Flags are converted once into the immutable values the rest of the
//! program works with.

use std::path::Path;
use std::time::Duration;

use clap::Parser;

use oobwatch_client::SessionOptions;
use oobwatch_client::options::DEFAULT_SERVER_URL;
use oobwatch_core::FilterConfig;

use crate::app::RunSettings;

#[derive(Parser, Debug, Clone)]
#[command(name = "oobwatch")]
#[command(version, about = "Out-of-band interaction client", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// URL of the correlation service. Only services that return unencrypted
    /// interactions are supported; public servers that encrypt poll payloads
    /// (including the default) are not
    #[arg(long, default_value = DEFAULT_SERVER_URL, env = "OOBWATCH_URL")]
    pub url: String,

    /// Number of interaction URLs to generate
    #[arg(short = 'n', long = "number", default_value_t = 1, env = "OOBWATCH_NUMBER")]
    pub number: usize,

    /// File to write output to (truncated on start)
    #[arg(short = 'o', long = "output", env = "OOBWATCH_OUTPUT")]
    pub output: Option<String>,

    /// Show JSON output
    #[arg(long, env = "OOBWATCH_JSON")]
    pub json: bool,

    /// Show raw requests and responses
    #[arg(short = 'v', long, env = "OOBWATCH_VERBOSE")]
    pub verbose: bool,

    /// Seconds between each poll request
    #[arg(
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..),
        env = "OOBWATCH_POLL_INTERVAL"
    )]
    pub poll_interval: u64,

    /// Keep the session registered on the service after exit
    #[arg(long, env = "OOBWATCH_PERSIST")]
    pub persist: bool,

    /// Display only DNS interactions
    #[arg(long, env = "OOBWATCH_DNS_ONLY")]
    pub dns_only: bool,

    /// Display only HTTP interactions
    #[arg(long, env = "OOBWATCH_HTTP_ONLY")]
    pub http_only: bool,

    /// Display only SMTP interactions
    #[arg(long, env = "OOBWATCH_SMTP_ONLY")]
    pub smtp_only: bool,

    /// Authentication token for the service
    #[arg(long, env = "OOBWATCH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Log level filter (e.g. "info", "debug", "warn").
    #[arg(long, default_value = "info", env = "OOBWATCH_LOG_LEVEL")]
    pub log_level: String,

    /// Output logs as JSON.
    #[arg(long, env = "OOBWATCH_LOG_JSON")]
    pub log_json: bool,
}

impl Args {
    /// Output file, if one was given. An empty path means none.
    pub fn output_path(&self) -> Option<&Path> {
        self.output
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(Path::new)
    }

    pub const fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            dns_only: self.dns_only,
            http_only: self.http_only,
            smtp_only: self.smtp_only,
            verbose: self.verbose,
            json: self.json,
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            server_url: self.url.clone(),
            persistent: self.persist,
            token: self.token.clone().unwrap_or_default(),
        }
    }

    pub const fn run_settings(&self) -> RunSettings {
        RunSettings {
            endpoints: self.number,
            poll_interval: Duration::from_secs(self.poll_interval),
            filter: self.filter_config(),
        }
    }

    /// `RUST_LOG`-style default filter for the tracing subscriber.
    pub fn log_filter(&self) -> String {
        format!("oobwatch={}", self.log_level)
    }
}
