//! Viten CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use viten::cli::{commands, Cli, Commands};
use viten::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first: the configured log level is the baseline,
    // raised by -v flags and overridable with RUST_LOG.
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    let log_level = match cli.verbose {
        0 => settings.general.log_level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("viten={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Ensure data directories exist
    std::fs::create_dir_all(settings.data_dir())?;
    std::fs::create_dir_all(settings.temp_dir())?;

    match &cli.command {
        Commands::Ingest { manifest } => {
            commands::run_ingest(manifest, cli.dry_run, settings).await?;
        }

        Commands::Youtube { url, title } => {
            commands::run_youtube(url, title.clone(), cli.dry_run, settings).await?;
        }

        Commands::Local { path, title } => {
            commands::run_local(path, title.clone(), cli.dry_run, settings).await?;
        }

        Commands::M3u8 { url, title, order } => {
            commands::run_m3u8(url, title.clone(), *order, cli.dry_run, settings).await?;
        }

        Commands::Batch { config_file } => {
            commands::run_batch(config_file, cli.dry_run, settings).await?;
        }

        Commands::Stats => {
            commands::run_stats(settings).await?;
        }

        Commands::View { port } => {
            commands::run_view(*port, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }
    }

    Ok(())
}
