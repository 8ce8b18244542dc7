//! M3U8 stream source implementation.

use super::{
    transcribe_location, Outcome, PipelineContext, ProcessingTarget, SourceKind, VideoSource,
};
use crate::error::Result;
use crate::ident;
use crate::store::VideoRecord;
use async_trait::async_trait;
use std::path::Path;
use tracing::{info, instrument};

/// M3U8 stream source.
pub struct M3u8Source;

impl M3u8Source {
    pub fn new() -> Self {
        Self
    }

    /// Title shared by every stream in a manifest: the manifest filename
    /// with the `m3u8-` prefix and `.txt` suffix stripped.
    fn derived_title(manifest: &Path) -> Option<String> {
        manifest
            .file_name()
            .and_then(|n| n.to_str())
            .map(|name| {
                name.strip_prefix("m3u8-")
                    .unwrap_or(name)
                    .strip_suffix(".txt")
                    .unwrap_or(name)
                    .to_string()
            })
    }
}

impl Default for M3u8Source {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoSource for M3u8Source {
    fn kind(&self) -> SourceKind {
        SourceKind::M3u8
    }

    /// Only lines ending in `.m3u8` become targets. Each carries the
    /// manifest-derived title and its 1-based position among matching lines.
    fn locate(&self, manifest: &Path) -> Result<Vec<ProcessingTarget>> {
        let title = Self::derived_title(manifest);

        let targets: Vec<ProcessingTarget> = super::read_manifest_lines(manifest)?
            .iter()
            .map(|line| line.trim())
            .filter(|line| line.ends_with(".m3u8"))
            .enumerate()
            .map(|(index, url)| ProcessingTarget {
                location: url.to_string(),
                title: title.clone(),
                order: index as u32 + 1,
            })
            .collect();

        info!("Found {} m3u8 streams in {:?}", targets.len(), manifest);
        Ok(targets)
    }

    #[instrument(skip(self, ctx), fields(location = %target.location))]
    async fn process_one(
        &self,
        target: &ProcessingTarget,
        ctx: &PipelineContext,
    ) -> Result<Outcome> {
        // The id is a pure function of the URL string; stream contents are
        // not stably retrievable.
        let video_id = ident::url_digest_id(&target.location);

        if ctx.store.contains(&video_id)? {
            info!("Video with ID {} already processed.", video_id);
            return Ok(Outcome::Skipped(video_id));
        }

        let content = transcribe_location(&target.location, ctx).await?;

        let title = target
            .title
            .clone()
            .unwrap_or_else(|| format!("Stream {}", target.order));

        let record = VideoRecord {
            id: video_id,
            title,
            content,
            creator: "Unknown".to_string(),
            // M3U8 entries record the raw stream URL as their source.
            source: target.location.clone(),
            upload_date: String::new(),
        };
        ctx.store.insert(&record)?;

        info!("M3U8 stream {} processed and inserted into store.", record.id);
        Ok(Outcome::Persisted(record.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_derives_title_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("m3u8-lesson1.txt");
        std::fs::write(
            &manifest,
            "http://a/x.m3u8\nhttp://a/y.m3u8\n",
        )
        .unwrap();

        let targets = M3u8Source::new().locate(&manifest).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].location, "http://a/x.m3u8");
        assert_eq!(targets[0].title.as_deref(), Some("lesson1"));
        assert_eq!(targets[0].order, 1);
        assert_eq!(targets[1].location, "http://a/y.m3u8");
        assert_eq!(targets[1].title.as_deref(), Some("lesson1"));
        assert_eq!(targets[1].order, 2);
    }

    #[test]
    fn test_locate_only_counts_matching_lines() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("m3u8-course.txt");
        std::fs::write(
            &manifest,
            "# comment line\nhttp://a/x.m3u8\nhttp://a/notes.txt\n\nhttp://a/y.m3u8\n",
        )
        .unwrap();

        let targets = M3u8Source::new().locate(&manifest).unwrap();
        assert_eq!(targets.len(), 2);
        // Order is position among matching lines, not raw line numbers
        assert_eq!(targets[0].order, 1);
        assert_eq!(targets[1].order, 2);
    }

    #[test]
    fn test_derived_title_strips_prefix_and_suffix() {
        assert_eq!(
            M3u8Source::derived_title(Path::new("/data/m3u8-lesson1.txt")).unwrap(),
            "lesson1"
        );
    }
}
