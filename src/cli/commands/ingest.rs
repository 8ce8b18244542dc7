//! Ingest command - process a whole manifest file.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Ingestor;
use crate::source::{source_for, SourceKind};
use anyhow::Result;
use std::path::Path;

/// Run the ingest command.
pub async fn run_ingest(manifest: &str, dry_run: bool, settings: Settings) -> Result<()> {
    let manifest = Path::new(manifest);

    if dry_run {
        let kind = SourceKind::from_manifest(manifest)?;
        let targets = source_for(kind).locate(manifest)?;
        Output::info(&format!(
            "Would process {} {} target(s) from {}",
            targets.len(),
            kind,
            manifest.display()
        ));
        for target in &targets {
            Output::list_item(&target.location);
        }
        return Ok(());
    }

    preflight::check(Operation::Ingest, &settings)?;

    let ingestor = Ingestor::new(&settings)?;

    let spinner = Output::spinner(&format!("Processing {}...", manifest.display()));
    let summary = ingestor.run_manifest(manifest).await?;
    spinner.finish_and_clear();

    Output::summary(summary.persisted, summary.skipped, summary.failed);

    if summary.failed > 0 {
        Output::warning(&format!(
            "{} target(s) failed; see the log for details.",
            summary.failed
        ));
    }

    Ok(())
}
