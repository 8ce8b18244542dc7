//! Youtube command - ingest a single YouTube video.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Ingestor;
use crate::source::{Outcome, ProcessingTarget, YoutubeSource};
use anyhow::Result;

/// Run the youtube command.
pub async fn run_youtube(
    url: &str,
    title: Option<String>,
    dry_run: bool,
    settings: Settings,
) -> Result<()> {
    if dry_run {
        Output::info(&format!("Would process YouTube URL: {}", url));
        return Ok(());
    }

    preflight::check(Operation::Ingest, &settings)?;

    let ingestor = Ingestor::new(&settings)?;
    let target = ProcessingTarget::new(url).with_title(title);

    let spinner = Output::spinner("Processing YouTube video...");
    let outcome = ingestor
        .process_target(&YoutubeSource::new(), &target)
        .await;
    spinner.finish_and_clear();

    match outcome {
        Ok(Outcome::Persisted(id)) => {
            Output::success(&format!("YouTube video {} processed successfully", id));
            Ok(())
        }
        Ok(Outcome::Skipped(id)) => {
            Output::info(&format!("Video {} already present; skipped", id));
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Error processing YouTube video: {}", e));
            Err(e.into())
        }
    }
}
