//! `ahn-laz-server` -- HTTP front end for LAZ selection jobs.

use std::sync::Arc;

use ahn_laz_server::cli::Cli;
use ahn_laz_server::network::{AppState, NetworkModule, ShutdownController};
use ahn_laz_server::telemetry::{init_logging, init_metrics};
use ahn_laz_server::SelectionService;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let submission = cli.submission_config();
    let estimator = cli.build_estimator()?;
    let submitter = cli.build_submitter()?;
    info!(
        backend = submitter.backend_name(),
        executable = %submission.executable_path,
        max_allowed_points = submission.max_allowed_points,
        "configuring selection service"
    );

    let service = SelectionService::new(estimator, submitter, &submission);
    let mut state = AppState::new(service, &submission, Arc::new(ShutdownController::new()));
    if !cli.no_metrics {
        state = state.with_metrics(init_metrics()?);
    }

    let mut network = NetworkModule::new(cli.network_config(), state);
    let port = network.start().await?;
    info!(port, "ahn-laz-server listening");

    network
        .serve(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            info!("shutdown signal received");
        })
        .await
}
