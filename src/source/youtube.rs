//! YouTube source implementation.

use super::{
    transcribe_location, Outcome, PipelineContext, ProcessingTarget, SourceKind, VideoSource,
};
use crate::error::{Result, VitenError};
use crate::ident;
use crate::store::VideoRecord;
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Metadata resolved for a YouTube video before transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub id: String,
    pub title: String,
    pub upload_date: String,
    pub creator: String,
}

/// YouTube video source.
pub struct YoutubeSource;

impl YoutubeSource {
    pub fn new() -> Self {
        Self
    }

    /// Extract title, upload date, and channel from a watch page.
    ///
    /// With a title override the remote fetch is skipped entirely and the
    /// date/creator fields are left empty.
    pub async fn extract_video_details(
        client: &reqwest::Client,
        url: &str,
        title_override: Option<&str>,
    ) -> Result<VideoDetails> {
        let id = ident::youtube_video_id(url)?;

        if let Some(title) = title_override {
            return Ok(VideoDetails {
                id,
                title: title.to_string(),
                upload_date: String::new(),
                creator: String::new(),
            });
        }

        debug!("Fetching watch page for {}", id);
        let html = client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| VitenError::MetadataExtraction(format!("{}: {}", url, e)))?
            .text()
            .await
            .map_err(|e| VitenError::MetadataExtraction(format!("{}: {}", url, e)))?;

        let details = parse_video_details(&html, &id).ok_or_else(|| {
            VitenError::MetadataExtraction(format!("expected metadata missing from {}", url))
        })?;

        info!(
            "Extracted details for {}: title={}, upload_date={}, creator={}",
            details.id, details.title, details.upload_date, details.creator
        );
        Ok(details)
    }

    /// Fetch a pre-existing caption transcript for a video.
    ///
    /// Returns None when no captions exist or anything goes wrong along the
    /// way. Caption absence is the expected common case, not a fault, so
    /// failures are logged and swallowed.
    pub async fn fetch_captions(client: &reqwest::Client, video_id: &str) -> Option<String> {
        match try_fetch_captions(client, video_id).await {
            Ok(Some(text)) if !text.trim().is_empty() => Some(text),
            Ok(_) => {
                info!("No caption transcript available for {}", video_id);
                None
            }
            Err(e) => {
                warn!("Caption lookup failed for {}: {}", video_id, e);
                None
            }
        }
    }
}

impl Default for YoutubeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoSource for YoutubeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::YouTube
    }

    /// One target per non-blank manifest line, in file order.
    ///
    /// No URL validation happens here; malformed URLs surface at id
    /// derivation during processing.
    fn locate(&self, manifest: &Path) -> Result<Vec<ProcessingTarget>> {
        info!("Reading video URLs from {:?}", manifest);
        let targets: Vec<ProcessingTarget> = super::read_manifest_lines(manifest)?
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(ProcessingTarget::new)
            .collect();
        info!("Found {} URLs", targets.len());
        Ok(targets)
    }

    #[instrument(skip(self, ctx), fields(location = %target.location))]
    async fn process_one(
        &self,
        target: &ProcessingTarget,
        ctx: &PipelineContext,
    ) -> Result<Outcome> {
        let video_id = ident::youtube_video_id(&target.location)?;

        if ctx.store.contains(&video_id)? {
            info!("Video {} already present in store. Skipping.", video_id);
            return Ok(Outcome::Skipped(video_id));
        }

        let details = Self::extract_video_details(
            &ctx.http,
            &target.location,
            target.title.as_deref(),
        )
        .await?;

        let content = match Self::fetch_captions(&ctx.http, &video_id).await {
            Some(transcript) => transcript,
            None => {
                info!(
                    "No transcript found for {}. Downloading audio for transcription.",
                    video_id
                );
                transcribe_location(&target.location, ctx).await?
            }
        };

        let record = VideoRecord {
            id: details.id,
            title: details.title,
            content,
            creator: details.creator,
            source: "YouTube".to_string(),
            upload_date: details.upload_date,
        };
        ctx.store.insert(&record)?;

        info!("Video {} processed and inserted into store.", record.id);
        Ok(Outcome::Persisted(record.id))
    }
}

/// Pull the three expected fields out of watch-page markup.
fn parse_video_details(html: &str, id: &str) -> Option<VideoDetails> {
    let title = itemprop_content(html, "meta", "name")?;
    let upload_date = itemprop_content(html, "meta", "datePublished")?;
    let creator = itemprop_content(html, "link", "name")?;

    Some(VideoDetails {
        id: id.to_string(),
        title,
        upload_date,
        creator,
    })
}

/// Find `content` of a `<tag itemprop="prop" ...>` element.
///
/// Attribute order is not fixed in the markup, so both orders are tried.
fn itemprop_content(html: &str, tag: &str, prop: &str) -> Option<String> {
    let prop_first = Regex::new(&format!(
        r#"<{tag}[^>]*\bitemprop="{prop}"[^>]*\bcontent="([^"]*)""#
    ))
    .expect("Invalid regex");
    let content_first = Regex::new(&format!(
        r#"<{tag}[^>]*\bcontent="([^"]*)"[^>]*\bitemprop="{prop}""#
    ))
    .expect("Invalid regex");

    prop_first
        .captures(html)
        .or_else(|| content_first.captures(html))
        .and_then(|caps| caps.get(1))
        .map(|m| decode_entities(m.as_str()))
}

/// Caption lookup: watch page -> caption track URL -> timedtext -> plain text.
async fn try_fetch_captions(
    client: &reqwest::Client,
    video_id: &str,
) -> Result<Option<String>> {
    let url = format!("https://www.youtube.com/watch?v={}", video_id);
    let html = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let track_re =
        Regex::new(r#""captionTracks":\[\{"baseUrl":"([^"]+)""#).expect("Invalid regex");
    let base_url = match track_re.captures(&html).and_then(|c| c.get(1)) {
        Some(m) => m.as_str().replace("\\u0026", "&").replace("\\/", "/"),
        None => return Ok(None),
    };

    debug!("Fetching caption track for {}", video_id);
    let xml = client
        .get(&base_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    Ok(Some(timedtext_to_plain(&xml)))
}

/// Flatten a timedtext XML document into space-joined plain text.
fn timedtext_to_plain(xml: &str) -> String {
    let text_re = Regex::new(r"<text[^>]*>([^<]*)</text>").expect("Invalid regex");
    let parts: Vec<String> = text_re
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .map(|m| decode_entities(m.as_str()))
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
        .collect();
    parts.join(" ")
}

fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_locate_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("youtube-talks.txt");
        let mut file = std::fs::File::create(&manifest).unwrap();
        writeln!(file, "https://www.youtube.com/watch?v=aaa").unwrap();
        writeln!(file, "https://www.youtube.com/watch?v=bbb").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "https://www.youtube.com/watch?v=ccc").unwrap();

        let targets = YoutubeSource::new().locate(&manifest).unwrap();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].location, "https://www.youtube.com/watch?v=aaa");
        assert_eq!(targets[2].location, "https://www.youtube.com/watch?v=ccc");
    }

    #[test]
    fn test_locate_missing_manifest_is_an_error() {
        let result = YoutubeSource::new().locate(Path::new("/no/such/youtube-x.txt"));
        assert!(matches!(result, Err(VitenError::Manifest(_))));
    }

    #[test]
    fn test_parse_video_details_from_markup() {
        let html = r#"
            <html><head>
            <meta itemprop="name" content="A Talk About Rust">
            <meta itemprop="datePublished" content="2023-05-17">
            <span itemprop="author"><link itemprop="name" content="RustConf"></span>
            </head></html>
        "#;
        let details = parse_video_details(html, "abc").unwrap();
        assert_eq!(details.title, "A Talk About Rust");
        assert_eq!(details.upload_date, "2023-05-17");
        assert_eq!(details.creator, "RustConf");
    }

    #[test]
    fn test_parse_video_details_handles_reversed_attributes() {
        let html = r#"
            <meta content="Reversed" itemprop="name">
            <meta content="2024-01-01" itemprop="datePublished">
            <link content="Channel" itemprop="name">
        "#;
        let details = parse_video_details(html, "abc").unwrap();
        assert_eq!(details.title, "Reversed");
        assert_eq!(details.creator, "Channel");
    }

    #[test]
    fn test_parse_video_details_missing_field() {
        let html = r#"<meta itemprop="name" content="Only a title">"#;
        assert!(parse_video_details(html, "abc").is_none());
    }

    #[test]
    fn test_timedtext_to_plain() {
        let xml = r#"<?xml version="1.0"?>
            <transcript>
              <text start="0.0" dur="2.5">Hello &amp; welcome</text>
              <text start="2.5" dur="3.0">to the talk</text>
              <text start="5.5" dur="1.0">  </text>
            </transcript>"#;
        assert_eq!(timedtext_to_plain(xml), "Hello & welcome to the talk");
    }
}
