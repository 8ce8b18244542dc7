//! Dedup key derivation for ingested videos.
//!
//! Every source kind maps to a stable identifier used as the store's primary
//! key: YouTube videos use the `v=` query parameter, local files a prefix of
//! the SHA-256 digest of their contents, M3U8 streams a prefix of the SHA-256
//! digest of the URL string itself (stream contents are not stably
//! retrievable).

use crate::error::{Result, VitenError};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Number of hex characters kept from a SHA-256 digest.
const DIGEST_ID_LEN: usize = 11;

/// Extract the video id from a YouTube watch URL.
///
/// The id is the value of the `v=` query parameter. URLs without one (or with
/// an empty one) are rejected.
pub fn youtube_video_id(url: &str) -> Result<String> {
    let parsed = url::Url::parse(url.trim())
        .map_err(|e| VitenError::MalformedUrl(format!("{}: {}", url, e)))?;

    let id = parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned());

    match id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(VitenError::MalformedUrl(format!(
            "no v= parameter in {}",
            url
        ))),
    }
}

/// Derive a content-addressed id from a local file.
///
/// Streams the file through SHA-256 in 1 MiB chunks and keeps the first 11
/// hex characters. Renaming or moving the file keeps the id; any byte-level
/// change produces a different one.
pub fn file_digest_id(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 1024 * 1024];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(truncate_digest(hasher.finalize().as_slice()))
}

/// Derive an id from a URL string alone.
///
/// Pure function of the UTF-8 encoded URL: deterministic and repeatable,
/// independent of whatever the URL currently serves.
pub fn url_digest_id(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    truncate_digest(hasher.finalize().as_slice())
}

fn truncate_digest(digest: &[u8]) -> String {
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex[..DIGEST_ID_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_youtube_video_id_from_watch_url() {
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        // Extra parameters after v= are ignored
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?v=abc123&t=42s").unwrap(),
            "abc123"
        );
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?list=PL1&v=xyz").unwrap(),
            "xyz"
        );
    }

    #[test]
    fn test_youtube_video_id_rejects_missing_parameter() {
        assert!(matches!(
            youtube_video_id("https://www.youtube.com/playlist?list=PL1"),
            Err(VitenError::MalformedUrl(_))
        ));
        assert!(matches!(
            youtube_video_id("https://www.youtube.com/watch?v="),
            Err(VitenError::MalformedUrl(_))
        ));
        assert!(matches!(
            youtube_video_id("not a url"),
            Err(VitenError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_file_digest_id_is_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let path_a = dir.path().join("first.mp4");
        let path_b = dir.path().join("renamed-copy.mp4");

        std::fs::File::create(&path_a)
            .unwrap()
            .write_all(b"identical video bytes")
            .unwrap();
        std::fs::File::create(&path_b)
            .unwrap()
            .write_all(b"identical video bytes")
            .unwrap();

        let id_a = file_digest_id(&path_a).unwrap();
        let id_b = file_digest_id(&path_b).unwrap();
        assert_eq!(id_a, id_b);
        assert_eq!(id_a.len(), DIGEST_ID_LEN);
        assert!(id_a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_file_digest_id_changes_with_content() {
        let dir = tempfile::tempdir().unwrap();
        let path_a = dir.path().join("a.mp4");
        let path_b = dir.path().join("b.mp4");

        std::fs::File::create(&path_a)
            .unwrap()
            .write_all(b"identical video bytes")
            .unwrap();
        std::fs::File::create(&path_b)
            .unwrap()
            .write_all(b"identical video byteX")
            .unwrap();

        assert_ne!(
            file_digest_id(&path_a).unwrap(),
            file_digest_id(&path_b).unwrap()
        );
    }

    #[test]
    fn test_url_digest_id_is_deterministic() {
        let url = "http://example.com/stream/lesson1.m3u8";
        assert_eq!(url_digest_id(url), url_digest_id(url));
        assert_eq!(url_digest_id(url).len(), DIGEST_ID_LEN);
        assert_ne!(
            url_digest_id(url),
            url_digest_id("http://example.com/stream/lesson2.m3u8")
        );
    }
}
