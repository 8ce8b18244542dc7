//! Video source abstraction.
//!
//! Provides a trait-based interface over the three source kinds (YouTube,
//! local files, M3U8 streams). The kind is a tag derived from the manifest
//! filename prefix; each kind knows how to enumerate processing targets from
//! a manifest and how to process a single target end to end.

mod local;
mod m3u8;
mod youtube;

pub use local::LocalSource;
pub use m3u8::M3u8Source;
pub use youtube::YoutubeSource;

use crate::audio;
use crate::error::{Result, VitenError};
use crate::store::SqliteStore;
use crate::transcribe::Transcriber;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Kind of video source, routed from the manifest filename prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    YouTube,
    Local,
    M3u8,
}

impl SourceKind {
    /// Derive the source kind from a manifest path.
    ///
    /// The filename prefix selects the kind (`youtube-*`, `local-*`,
    /// `m3u8-*`); the suffix must be `.txt`. Anything else is a
    /// configuration error that aborts the run.
    pub fn from_manifest(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| VitenError::Manifest(format!("invalid manifest path: {:?}", path)))?;

        if !name.ends_with(".txt") {
            return Err(VitenError::Manifest(format!(
                "manifest must be a .txt file: {}",
                name
            )));
        }

        if name.starts_with("youtube-") {
            Ok(SourceKind::YouTube)
        } else if name.starts_with("local-") {
            Ok(SourceKind::Local)
        } else if name.starts_with("m3u8-") {
            Ok(SourceKind::M3u8)
        } else {
            Err(VitenError::UnsupportedSourceKind(name.to_string()))
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::YouTube => write!(f, "youtube"),
            SourceKind::Local => write!(f, "local"),
            SourceKind::M3u8 => write!(f, "m3u8"),
        }
    }
}

/// A single item to process: a locator plus optional overrides.
///
/// Produced by `locate`, consumed once by the pipeline, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingTarget {
    /// URL or filesystem path.
    pub location: String,
    /// Explicit title (batch override) or derived title (M3U8).
    pub title: Option<String>,
    /// 1-based position among matching manifest lines (meaningful for M3U8).
    pub order: u32,
}

impl ProcessingTarget {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            title: None,
            order: 1,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }
}

/// Shared collaborators handed to every `process_one` call.
pub struct PipelineContext {
    pub store: Arc<SqliteStore>,
    pub transcriber: Arc<dyn Transcriber>,
    pub http: reqwest::Client,
    pub temp_dir: PathBuf,
}

/// Terminal state of a processed target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new record was written under this id.
    Persisted(String),
    /// The id already existed; no work was performed.
    Skipped(String),
}

/// Trait for video source providers.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Get the source kind.
    fn kind(&self) -> SourceKind;

    /// Enumerate processing targets from a manifest file.
    ///
    /// Side-effect free beyond filesystem reads; re-reading the manifest
    /// yields the same sequence.
    fn locate(&self, manifest: &Path) -> Result<Vec<ProcessingTarget>>;

    /// Process a single target from id derivation through persistence.
    async fn process_one(
        &self,
        target: &ProcessingTarget,
        ctx: &PipelineContext,
    ) -> Result<Outcome>;
}

/// Build the source implementation for a kind.
pub fn source_for(kind: SourceKind) -> Box<dyn VideoSource> {
    match kind {
        SourceKind::YouTube => Box::new(YoutubeSource::new()),
        SourceKind::Local => Box::new(LocalSource::new()),
        SourceKind::M3u8 => Box::new(M3u8Source::new()),
    }
}

/// Read manifest lines, mapping read failures to a run-aborting error.
pub(crate) fn read_manifest_lines(manifest: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(manifest)
        .map_err(|e| VitenError::Manifest(format!("cannot read {:?}: {}", manifest, e)))?;
    Ok(content.lines().map(|l| l.to_string()).collect())
}

/// Materialize audio for a location and transcribe it.
///
/// The shared AUDIO_READY -> TRANSCRIBED leg used by every kind; the WAV
/// artifact is scoped and removed on all exit paths.
pub(crate) async fn transcribe_location(location: &str, ctx: &PipelineContext) -> Result<String> {
    let artifact = audio::materialize(location, &ctx.temp_dir).await?;
    ctx.transcriber.transcribe(artifact).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_manifest_prefix() {
        assert_eq!(
            SourceKind::from_manifest(Path::new("youtube-talks.txt")).unwrap(),
            SourceKind::YouTube
        );
        assert_eq!(
            SourceKind::from_manifest(Path::new("/some/dir/local-videos.txt")).unwrap(),
            SourceKind::Local
        );
        assert_eq!(
            SourceKind::from_manifest(Path::new("m3u8-lesson1.txt")).unwrap(),
            SourceKind::M3u8
        );
    }

    #[test]
    fn test_kind_rejects_unknown_prefix() {
        assert!(matches!(
            SourceKind::from_manifest(Path::new("vimeo-talks.txt")),
            Err(VitenError::UnsupportedSourceKind(_))
        ));
    }

    #[test]
    fn test_kind_rejects_non_txt_suffix() {
        assert!(matches!(
            SourceKind::from_manifest(Path::new("youtube-talks.csv")),
            Err(VitenError::Manifest(_))
        ));
    }
}
