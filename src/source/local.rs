//! Local file source implementation.

use super::{
    transcribe_location, Outcome, PipelineContext, ProcessingTarget, SourceKind, VideoSource,
};
use crate::error::Result;
use crate::ident;
use crate::store::VideoRecord;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Recognized video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "m4v"];

/// Local filesystem video source.
pub struct LocalSource;

impl LocalSource {
    pub fn new() -> Self {
        Self
    }

    /// Check if path has a recognized video extension.
    fn is_video_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }

    /// Recursively collect video files under a directory.
    ///
    /// Traversal order is filesystem-dependent and not guaranteed stable.
    fn walk_directory(dir: &Path, found: &mut Vec<PathBuf>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot read directory {:?}: {}", dir, e);
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                Self::walk_directory(&path, found);
            } else if Self::is_video_file(&path) {
                found.push(path);
            }
        }
    }

    fn absolute(path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }
}

impl Default for LocalSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoSource for LocalSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Local
    }

    /// Each manifest line is either a video file (yielding its absolute
    /// path) or a directory, walked recursively for contained video files.
    /// Lines naming anything else are ignored.
    fn locate(&self, manifest: &Path) -> Result<Vec<ProcessingTarget>> {
        let mut paths: Vec<PathBuf> = Vec::new();

        for line in super::read_manifest_lines(manifest)? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let path = Path::new(line);
            if path.is_file() && Self::is_video_file(path) {
                paths.push(Self::absolute(path));
            } else if path.is_dir() {
                Self::walk_directory(path, &mut paths);
            }
        }

        info!("Found {} video files in {:?}", paths.len(), manifest);
        Ok(paths
            .into_iter()
            .map(|p| ProcessingTarget::new(p.to_string_lossy().into_owned()))
            .collect())
    }

    #[instrument(skip(self, ctx), fields(location = %target.location))]
    async fn process_one(
        &self,
        target: &ProcessingTarget,
        ctx: &PipelineContext,
    ) -> Result<Outcome> {
        let path = Path::new(&target.location);
        let video_id = ident::file_digest_id(path)?;

        if ctx.store.contains(&video_id)? {
            info!("Video with ID {} already processed.", video_id);
            return Ok(Outcome::Skipped(video_id));
        }

        let content = transcribe_location(&target.location, ctx).await?;

        let title = target.title.clone().unwrap_or_else(|| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| target.location.clone())
        });

        let creator = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Unknown".to_string());

        let record = VideoRecord {
            id: video_id,
            title,
            content,
            creator,
            source: "Local".to_string(),
            upload_date: String::new(),
        };
        ctx.store.insert(&record)?;

        info!("Video {} processed and inserted into store.", record.id);
        Ok(Outcome::Persisted(record.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_is_video_file() {
        assert!(LocalSource::is_video_file(Path::new("clip.mp4")));
        assert!(LocalSource::is_video_file(Path::new("clip.MKV")));
        assert!(LocalSource::is_video_file(Path::new("/a/b/clip.m4v")));
        assert!(!LocalSource::is_video_file(Path::new("notes.txt")));
        assert!(!LocalSource::is_video_file(Path::new("clip")));
    }

    #[test]
    fn test_locate_directory_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let videos = dir.path().join("videos");
        std::fs::create_dir(&videos).unwrap();
        touch(&videos.join("one.mp4"));
        touch(&videos.join("two.mp4"));
        touch(&videos.join("readme.txt"));

        let manifest = dir.path().join("local-videos.txt");
        std::fs::write(&manifest, format!("{}\n", videos.display())).unwrap();

        let mut targets = LocalSource::new().locate(&manifest).unwrap();
        targets.sort_by(|a, b| a.location.cmp(&b.location));
        assert_eq!(targets.len(), 2);
        assert!(targets[0].location.ends_with("one.mp4"));
        assert!(targets[1].location.ends_with("two.mp4"));
    }

    #[test]
    fn test_locate_direct_file_yields_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("talk.mov");
        touch(&video);

        let manifest = dir.path().join("local-talks.txt");
        std::fs::write(&manifest, format!("{}\n", video.display())).unwrap();

        let targets = LocalSource::new().locate(&manifest).unwrap();
        assert_eq!(targets.len(), 1);
        assert!(Path::new(&targets[0].location).is_absolute());
        assert!(targets[0].location.ends_with("talk.mov"));
    }

    #[test]
    fn test_locate_walks_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("course").join("week1");
        std::fs::create_dir_all(&nested).unwrap();
        touch(&dir.path().join("course").join("intro.mp4"));
        touch(&nested.join("lecture.mkv"));
        touch(&nested.join("slides.pdf"));

        let manifest = dir.path().join("local-course.txt");
        std::fs::write(&manifest, format!("{}\n", dir.path().join("course").display())).unwrap();

        let targets = LocalSource::new().locate(&manifest).unwrap();
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn test_locate_ignores_unrecognized_lines() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("local-videos.txt");
        std::fs::write(
            &manifest,
            "/does/not/exist.mp4\nnot-a-path\n",
        )
        .unwrap();

        let targets = LocalSource::new().locate(&manifest).unwrap();
        assert!(targets.is_empty());
    }
}
