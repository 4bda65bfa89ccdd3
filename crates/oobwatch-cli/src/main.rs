use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use oobwatch_cli::app;
use oobwatch_cli::banner::write_banner;
use oobwatch_cli::cli::Args;
use oobwatch_cli::shutdown::{EXIT_STATUS, ShutdownReason, interrupt_signal};
use oobwatch_client::HttpSession;
use oobwatch_core::OutputSink;
use oobwatch_core::tracing_init::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log_filter(), args.log_json);

    if let Err(e) = write_banner(&mut io::stderr()) {
        warn!(error = %e, "Could not write banner");
    }

    match run(args).await {
        Ok(reason) => {
            info!(?reason, "Stopped");
            ExitCode::from(EXIT_STATUS)
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ShutdownReason> {
    let sink = Arc::new(OutputSink::create(args.output_path())?);
    if let Some(path) = args.output_path() {
        info!(path = %path.display(), "Writing output to file");
    }

    let session = HttpSession::connect(&args.session_options())
        .await
        .context("Could not create client")?;

    let reason = app::run(session, &args.run_settings(), sink, interrupt_signal())
        .await
        .context("Could not start polling")?;
    Ok(reason)
}
