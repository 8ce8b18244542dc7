//! Local command - ingest a single local video file.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Ingestor;
use crate::source::{LocalSource, Outcome, ProcessingTarget};
use anyhow::Result;
use std::path::Path;

/// Run the local command.
pub async fn run_local(
    path: &str,
    title: Option<String>,
    dry_run: bool,
    settings: Settings,
) -> Result<()> {
    let file = Path::new(path);
    if !file.exists() {
        Output::error(&format!("File not found: {}", path));
        anyhow::bail!("file not found: {}", path);
    }

    if dry_run {
        Output::info(&format!("Would process local file: {}", path));
        return Ok(());
    }

    preflight::check(Operation::Ingest, &settings)?;

    let ingestor = Ingestor::new(&settings)?;
    let absolute = std::fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf());
    let target = ProcessingTarget::new(absolute.to_string_lossy().into_owned()).with_title(title);

    let spinner = Output::spinner("Processing local video...");
    let outcome = ingestor.process_target(&LocalSource::new(), &target).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(Outcome::Persisted(id)) => {
            Output::success(&format!("Local video {} processed successfully", id));
            Ok(())
        }
        Ok(Outcome::Skipped(id)) => {
            Output::info(&format!("Video {} already present; skipped", id));
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Error processing local video: {}", e));
            Err(e.into())
        }
    }
}
