use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;

use imageloader::cli::{Cli, Session};
use imageloader::config::ConfigStore;
use imageloader::connectivity::ConnectivityMonitor;
use imageloader::fetch::{
    FetchStatus, HttpTransport, ImageCrateDecoder, ImageFetchController, TransportLimits,
};
use imageloader::logging::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let store = ConfigStore::open(cli.config_path()).context("failed to load configuration")?;
    store
        .update(|config| cli.apply_overrides(config))
        .context("invalid command-line override")?;
    let config = store.get();

    init_tracing(&config.ui.log_level);
    tracing::debug!(path = %store.path().display(), ?config, "Configuration loaded");

    let transport = HttpTransport::new(TransportLimits::from(&config.fetch))
        .context("failed to build HTTP client")?;
    let controller =
        ImageFetchController::new(transport, ImageCrateDecoder, config.fetch.cancel_policy);
    tracing::info!(
        policy = ?controller.policy(),
        timeout_seconds = config.fetch.timeout_seconds,
        "Fetch controller ready"
    );
    let connectivity = ConnectivityMonitor::from_config(&config.connectivity).await;
    let session = Session::new(controller, connectivity, config.ui.default_url.clone());

    let mut stdout = std::io::stdout();

    if let Some(url) = cli.url.as_deref() {
        let status = session.run_once(url, &mut stdout).await?;
        stdout.flush()?;
        return Ok(match status {
            FetchStatus::Success(_) => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        });
    }

    let input = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = session.run_interactive(input, &mut stdout) => result?,
        _ = tokio::signal::ctrl_c() => {
            session.controller().cancel_current();
            tracing::info!("Interrupted");
        }
    }
    stdout.flush()?;
    Ok(ExitCode::SUCCESS)
}
