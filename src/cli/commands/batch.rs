//! Batch command - process videos from a YAML configuration file.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::{Ingestor, RunSummary};
use crate::source::{
    LocalSource, M3u8Source, Outcome, ProcessingTarget, VideoSource, YoutubeSource,
};
use anyhow::Result;
use serde::Deserialize;
use tracing::error;

/// Top-level YAML batch configuration.
#[derive(Debug, Deserialize)]
pub struct BatchConfig {
    pub videos: BatchVideos,
}

/// Per-kind entry lists.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BatchVideos {
    pub youtube: Vec<YoutubeEntry>,
    pub local: Vec<LocalEntry>,
    pub m3u8: Vec<M3u8Entry>,
}

#[derive(Debug, Deserialize)]
pub struct YoutubeEntry {
    pub url: String,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocalEntry {
    pub path: String,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct M3u8Entry {
    pub url: String,
    pub title: Option<String>,
    pub order: Option<u32>,
}

impl BatchConfig {
    pub fn parse(content: &str) -> crate::error::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn total(&self) -> usize {
        self.videos.youtube.len() + self.videos.local.len() + self.videos.m3u8.len()
    }

    /// Flatten the entries into (source, target) pairs, YouTube first, then
    /// local, then m3u8 - the order they are processed in.
    fn into_work(self) -> Vec<(Box<dyn VideoSource>, ProcessingTarget)> {
        let mut work: Vec<(Box<dyn VideoSource>, ProcessingTarget)> = Vec::new();

        for entry in self.videos.youtube {
            work.push((
                Box::new(YoutubeSource::new()),
                ProcessingTarget::new(entry.url).with_title(entry.title),
            ));
        }
        for entry in self.videos.local {
            work.push((
                Box::new(LocalSource::new()),
                ProcessingTarget::new(entry.path).with_title(entry.title),
            ));
        }
        for entry in self.videos.m3u8 {
            work.push((
                Box::new(M3u8Source::new()),
                ProcessingTarget {
                    location: entry.url,
                    title: entry.title,
                    order: entry.order.unwrap_or(1),
                },
            ));
        }

        work
    }
}

/// Run the batch command.
pub async fn run_batch(config_file: &str, dry_run: bool, settings: Settings) -> Result<()> {
    let content = std::fs::read_to_string(config_file)
        .map_err(|e| anyhow::anyhow!("Error reading YAML config {}: {}", config_file, e))?;
    let config = BatchConfig::parse(&content)?;
    let total = config.total();

    if dry_run {
        Output::info(&format!(
            "Would process {} video(s) from {}",
            total, config_file
        ));
        for entry in &config.videos.youtube {
            Output::list_item(&format!("YouTube: {}", entry.url));
        }
        for entry in &config.videos.local {
            Output::list_item(&format!("Local: {}", entry.path));
        }
        for entry in &config.videos.m3u8 {
            Output::list_item(&format!("M3U8: {}", entry.url));
        }
        return Ok(());
    }

    preflight::check(Operation::Ingest, &settings)?;

    Output::info(&format!(
        "Processing {} video(s) from {}...",
        total, config_file
    ));

    let ingestor = Ingestor::new(&settings)?;
    let pb = Output::progress_bar(total as u64, "Processing videos...");
    let mut summary = RunSummary::default();

    for (source, target) in config.into_work() {
        match ingestor.process_target(source.as_ref(), &target).await {
            Ok(Outcome::Persisted(_)) => summary.persisted += 1,
            Ok(Outcome::Skipped(_)) => summary.skipped += 1,
            Err(e) => {
                error!("Failed to process {}: {}", target.location, e);
                pb.println(format!("  error: {}: {}", target.location, e));
                summary.failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Output::summary(summary.persisted, summary.skipped, summary.failed);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch_config() {
        let yaml = r#"
videos:
  youtube:
    - url: https://www.youtube.com/watch?v=abc
    - url: https://www.youtube.com/watch?v=def
      title: Override
  local:
    - path: /videos/talk.mp4
  m3u8:
    - url: http://a/x.m3u8
      title: lesson1
      order: 2
"#;
        let config = BatchConfig::parse(yaml).unwrap();
        assert_eq!(config.total(), 4);
        assert_eq!(config.videos.youtube[1].title.as_deref(), Some("Override"));
        assert_eq!(config.videos.m3u8[0].order, Some(2));
    }

    #[test]
    fn test_parse_batch_config_with_missing_kinds() {
        let yaml = r#"
videos:
  youtube:
    - url: https://www.youtube.com/watch?v=abc
"#;
        let config = BatchConfig::parse(yaml).unwrap();
        assert_eq!(config.total(), 1);
        assert!(config.videos.local.is_empty());
        assert!(config.videos.m3u8.is_empty());
    }

    #[test]
    fn test_parse_rejects_missing_videos_section() {
        assert!(BatchConfig::parse("other: 1\n").is_err());
    }
}
