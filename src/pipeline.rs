//! Ingestion pipeline orchestration.
//!
//! Composes id derivation, the store's existence gate, metadata extraction,
//! audio materialization, and transcription into a "process one item"
//! operation, and runs manifests through it with per-item fault isolation:
//! a failing target is logged and counted, never aborts the batch.

use crate::config::Settings;
use crate::error::Result;
use crate::source::{
    source_for, Outcome, PipelineContext, ProcessingTarget, SourceKind, VideoSource,
};
use crate::store::SqliteStore;
use crate::transcribe::{create_transcriber, Transcriber};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Counts for a completed batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// New records written.
    pub persisted: usize,
    /// Targets whose id already existed.
    pub skipped: usize,
    /// Targets that failed and were passed over.
    pub failed: usize,
}

impl RunSummary {
    /// Items that completed without error (persisted or skipped).
    pub fn succeeded(&self) -> usize {
        self.persisted + self.skipped
    }

    pub fn total(&self) -> usize {
        self.persisted + self.skipped + self.failed
    }
}

/// The ingestion orchestrator.
///
/// Owns the shared collaborators and processes targets strictly
/// sequentially: one target runs from locate to persist (or skip) before the
/// next one starts.
pub struct Ingestor {
    ctx: PipelineContext,
}

impl Ingestor {
    /// Create an ingestor from settings: opens the store, resolves the
    /// transcription engine, and prepares the temp directory.
    pub fn new(settings: &Settings) -> Result<Self> {
        let store = Arc::new(SqliteStore::new(&settings.db_path())?);
        let transcriber = create_transcriber(settings);

        let temp_dir = settings.temp_dir();
        std::fs::create_dir_all(&temp_dir)?;

        Ok(Self {
            ctx: PipelineContext {
                store,
                transcriber,
                http: reqwest::Client::new(),
                temp_dir,
            },
        })
    }

    /// Create an ingestor with explicit components.
    pub fn with_components(
        store: Arc<SqliteStore>,
        transcriber: Arc<dyn Transcriber>,
        temp_dir: std::path::PathBuf,
    ) -> Self {
        Self {
            ctx: PipelineContext {
                store,
                transcriber,
                http: reqwest::Client::new(),
                temp_dir,
            },
        }
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &Arc<SqliteStore> {
        &self.ctx.store
    }

    /// Run a whole manifest: route the kind from the filename, enumerate
    /// targets, process each with fault isolation.
    ///
    /// Locate-phase failures (unreadable manifest, unsupported prefix) abort
    /// the run; per-item failures do not.
    #[instrument(skip(self))]
    pub async fn run_manifest(&self, manifest: &Path) -> Result<RunSummary> {
        let kind = SourceKind::from_manifest(manifest)?;
        let source = source_for(kind);
        let targets = source.locate(manifest)?;

        info!("Processing {} {} targets from {:?}", targets.len(), kind, manifest);
        Ok(self.run_targets(source.as_ref(), &targets).await)
    }

    /// Process a sequence of targets, containing per-item failures.
    pub async fn run_targets(
        &self,
        source: &dyn VideoSource,
        targets: &[ProcessingTarget],
    ) -> RunSummary {
        let mut summary = RunSummary::default();

        for target in targets {
            match source.process_one(target, &self.ctx).await {
                Ok(Outcome::Persisted(id)) => {
                    info!("Persisted {} ({})", id, target.location);
                    summary.persisted += 1;
                }
                Ok(Outcome::Skipped(id)) => {
                    info!("Skipped {} ({})", id, target.location);
                    summary.skipped += 1;
                }
                Err(e) => {
                    error!("Failed to process {}: {}", target.location, e);
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Process a single target for a kind; errors surface to the caller.
    pub async fn process_target(
        &self,
        source: &dyn VideoSource,
        target: &ProcessingTarget,
    ) -> Result<Outcome> {
        source.process_one(target, &self.ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioArtifact;
    use crate::error::VitenError;
    use crate::store::VideoRecord;
    use async_trait::async_trait;

    /// Transcriber stub; the stub source below never reaches audio work.
    struct NoopTranscriber;

    #[async_trait]
    impl Transcriber for NoopTranscriber {
        async fn transcribe(&self, _audio: AudioArtifact) -> Result<String> {
            Ok(String::new())
        }
    }

    /// Source stub mirroring the real per-target flow: existence gate,
    /// then either a simulated failure or an insert.
    struct StubSource {
        failing_location: Option<String>,
    }

    #[async_trait]
    impl VideoSource for StubSource {
        fn kind(&self) -> SourceKind {
            SourceKind::Local
        }

        fn locate(&self, _manifest: &Path) -> Result<Vec<ProcessingTarget>> {
            unreachable!("tests drive run_targets directly")
        }

        async fn process_one(
            &self,
            target: &ProcessingTarget,
            ctx: &PipelineContext,
        ) -> Result<Outcome> {
            let id = crate::ident::url_digest_id(&target.location);

            if ctx.store.contains(&id)? {
                return Ok(Outcome::Skipped(id));
            }

            if self.failing_location.as_deref() == Some(target.location.as_str()) {
                return Err(VitenError::AudioMaterialization("simulated".into()));
            }

            let mut record = VideoRecord::new(id.clone(), target.location.clone());
            record.source = "Local".to_string();
            ctx.store.insert(&record)?;
            Ok(Outcome::Persisted(id))
        }
    }

    fn test_ingestor() -> Ingestor {
        Ingestor::with_components(
            Arc::new(SqliteStore::in_memory().unwrap()),
            Arc::new(NoopTranscriber),
            std::env::temp_dir(),
        )
    }

    fn targets(locations: &[&str]) -> Vec<ProcessingTarget> {
        locations
            .iter()
            .map(|l| ProcessingTarget::new(*l))
            .collect()
    }

    #[tokio::test]
    async fn test_failure_isolation() {
        let ingestor = test_ingestor();
        let source = StubSource {
            failing_location: Some("item-2".to_string()),
        };

        let summary = ingestor
            .run_targets(&source, &targets(&["item-1", "item-2", "item-3"]))
            .await;

        assert_eq!(summary.persisted, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded(), 2);

        // Items 1 and 3 landed despite item 2 failing
        let store = ingestor.store();
        assert!(store
            .contains(&crate::ident::url_digest_id("item-1"))
            .unwrap());
        assert!(!store
            .contains(&crate::ident::url_digest_id("item-2"))
            .unwrap());
        assert!(store
            .contains(&crate::ident::url_digest_id("item-3"))
            .unwrap());
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let ingestor = test_ingestor();
        let source = StubSource {
            failing_location: None,
        };
        let batch = targets(&["item-1", "item-2"]);

        let first = ingestor.run_targets(&source, &batch).await;
        assert_eq!(first.persisted, 2);
        assert_eq!(ingestor.store().stats().unwrap().video_count, 2);

        let second = ingestor.run_targets(&source, &batch).await;
        assert_eq!(second.persisted, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(ingestor.store().stats().unwrap().video_count, 2);
    }

    #[tokio::test]
    async fn test_run_manifest_rejects_unsupported_kind() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("vimeo-talks.txt");
        std::fs::write(&manifest, "http://example.com\n").unwrap();

        let ingestor = test_ingestor();
        let result = ingestor.run_manifest(&manifest).await;
        assert!(matches!(
            result,
            Err(VitenError::UnsupportedSourceKind(_))
        ));
    }
}
