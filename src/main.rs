use anyhow::{Result, bail};
use clap::Parser;
use tokio::signal;

use support_ingest::cli::commands::{handle_search, handle_status, handle_upsert};
use support_ingest::cli::{Cli, Commands};
use support_ingest::logging;
use support_ingest::models::OutputFormat;

/// Load `.env.local` then `.env`. Variables already set are never overwritten,
/// so the real environment wins, then `.env.local`, then `.env`.
fn load_env_files() {
    for file in [".env.local", ".env"] {
        if let Err(e) = dotenvy::from_filename(file)
            && !e.not_found()
        {
            eprintln!("Warning: failed to load {}: {}", file, e);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env_files();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let format = cli.format.unwrap_or_default();
    let command = cli.command.unwrap_or_default();

    tokio::select! {
        result = run_command(command, format) => {
            result?;
        }
        _ = shutdown_signal() => {
            bail!("interrupted by shutdown signal");
        }
    }

    Ok(())
}

async fn run_command(command: Commands, format: OutputFormat) -> Result<()> {
    match command {
        Commands::Upsert(args) => {
            handle_upsert(args, format).await?;
        }
        Commands::Status => {
            handle_status(format).await?;
        }
        Commands::Search(args) => {
            handle_search(args, format).await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
