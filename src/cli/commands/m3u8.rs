//! M3u8 command - ingest a single M3U8 stream.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Ingestor;
use crate::source::{M3u8Source, Outcome, ProcessingTarget};
use anyhow::Result;

/// Run the m3u8 command.
pub async fn run_m3u8(
    url: &str,
    title: Option<String>,
    order: u32,
    dry_run: bool,
    settings: Settings,
) -> Result<()> {
    if dry_run {
        Output::info(&format!("Would process M3U8 stream: {}", url));
        return Ok(());
    }

    preflight::check(Operation::Ingest, &settings)?;

    let ingestor = Ingestor::new(&settings)?;
    let target = ProcessingTarget {
        location: url.to_string(),
        title,
        order,
    };

    let spinner = Output::spinner("Processing M3U8 stream...");
    let outcome = ingestor.process_target(&M3u8Source::new(), &target).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(Outcome::Persisted(id)) => {
            Output::success(&format!("M3U8 stream {} processed successfully", id));
            Ok(())
        }
        Ok(Outcome::Skipped(id)) => {
            Output::info(&format!("Stream {} already present; skipped", id));
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Error processing M3U8 stream: {}", e));
            Err(e.into())
        }
    }
}
