//! nbexport — discover and export every notebook in a Databricks workspace.
//!
//! Two phases share one governed API client: a recursive concurrent walk of
//! the workspace tree, then a joined fan-out export of every discovered
//! notebook with checkpointed progress.

#![warn(clippy::all)]

mod api;
mod cli;
mod config;
mod discover;
mod export;
pub mod retry;
mod shutdown;
mod types;

use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use api::WorkspaceClient;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let filter = match cli.log_level {
        types::LogLevel::Debug => "debug",
        types::LogLevel::Info => "info",
        types::LogLevel::Warn => "warn",
        types::LogLevel::Error => "error",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = Config::from_cli(cli)?;
    tracing::debug!(?config, "Starting export run");

    let shutdown_token = shutdown::install_signal_handler();

    tokio::select! {
        result = run(&config) => result,
        _ = shutdown_token.cancelled() => {
            anyhow::bail!("Interrupted before the run completed")
        }
    }
}

async fn run(config: &Config) -> anyhow::Result<()> {
    let client = WorkspaceClient::new(
        config.base_url.clone(),
        config.token.clone(),
        config.max_connections,
        config.request_timeout,
    );

    let started = Instant::now();
    let index = discover::discover(&client, &config.workspace).await?;
    tracing::info!(
        "Found {} notebooks in {:.2}s",
        index.len(),
        started.elapsed().as_secs_f64()
    );

    // The snapshot is written before export starts, so it exists even if
    // the export phase later aborts.
    export::checkpoint::write_all_ids(&config.all_ids_path, &index.object_ids()).await?;

    let export_config = export::ExportConfig {
        checkpoint_path: config.checkpoint_path.clone(),
        failure_mode: config.failure_mode,
        retry: config.retry,
        no_progress_bar: config.no_progress_bar,
    };
    let outcome = export::export_all(&client, &index, &export_config).await?;

    if let Some(path) = &config.output_path {
        let json = serde_json::to_string_pretty(&outcome.notebooks)?;
        tokio::fs::write(path, json).await?;
        tracing::info!(
            "Wrote {} records to {}",
            outcome.notebooks.len(),
            path.display()
        );
    }

    if outcome.failed > 0 {
        anyhow::bail!("{} of {} exports failed", outcome.failed, index.len());
    }
    Ok(())
}
