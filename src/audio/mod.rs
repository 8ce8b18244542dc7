//! Audio materialization.
//!
//! Produces a normalized mono 16 kHz WAV artifact for a location, delegating
//! to yt-dlp for remote URLs and ffmpeg for local files. The artifact lives in
//! its own temporary directory and is removed on every exit path when the
//! [`AudioArtifact`] drops.

use crate::error::{Result, VitenError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Target sample rate required by the speech-recognition engines.
const SAMPLE_RATE: u32 = 16_000;

/// A scoped WAV artifact.
///
/// Owns the temporary directory the WAV lives in; dropping the artifact
/// deletes the file, whether processing succeeded or failed.
pub struct AudioArtifact {
    path: PathBuf,
    _dir: TempDir,
}

impl AudioArtifact {
    /// Path to the WAV file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for AudioArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioArtifact")
            .field("path", &self.path)
            .finish()
    }
}

/// Materialize a mono 16 kHz WAV for the given location.
///
/// Remote locations (`http://`, `https://`) are downloaded with yt-dlp;
/// local paths are converted with ffmpeg.
#[instrument(skip(temp_root))]
pub async fn materialize(location: &str, temp_root: &Path) -> Result<AudioArtifact> {
    std::fs::create_dir_all(temp_root)?;
    let dir = TempDir::new_in(temp_root)?;
    let wav_path = dir.path().join("audio.wav");

    if location.starts_with("http://") || location.starts_with("https://") {
        download_audio(location, &wav_path).await?;
    } else {
        convert_local(Path::new(location), &wav_path).await?;
    }

    if !wav_path.exists() {
        return Err(VitenError::AudioMaterialization(format!(
            "no WAV produced for {}",
            location
        )));
    }

    info!("Materialized audio at {:?}", wav_path);
    Ok(AudioArtifact {
        path: wav_path,
        _dir: dir,
    })
}

/// Downloads and extracts audio from a URL using yt-dlp.
async fn download_audio(url: &str, wav_path: &Path) -> Result<()> {
    info!("Downloading audio from {}", url);

    let template = wav_path.with_extension("%(ext)s");

    let result = Command::new("yt-dlp")
        .arg("--extract-audio")
        .arg("--audio-format").arg("wav")
        .arg("--postprocessor-args").arg(format!("ffmpeg:-ar {} -ac 1", SAMPLE_RATE))
        .arg("--output").arg(template.to_str().unwrap_or_default())
        .arg("--no-playlist")
        .arg("--quiet")
        .arg("--no-warnings")
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(VitenError::ToolNotFound("yt-dlp".into()));
        }
        Err(e) => {
            return Err(VitenError::AudioMaterialization(format!(
                "yt-dlp execution failed: {e}"
            )));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VitenError::AudioMaterialization(format!(
            "yt-dlp failed: {stderr}"
        )));
    }

    Ok(())
}

/// Converts a local media file to mono 16 kHz WAV using ffmpeg.
async fn convert_local(source: &Path, wav_path: &Path) -> Result<()> {
    debug!("Converting {:?} to WAV", source);

    let result = Command::new("ffmpeg")
        .arg("-i").arg(source)
        .arg("-vn")
        .arg("-ar").arg(SAMPLE_RATE.to_string())
        .arg("-ac").arg("1")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(wav_path)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(VitenError::AudioMaterialization(format!(
                "ffmpeg conversion failed: {err}"
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(VitenError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(VitenError::AudioMaterialization(format!(
            "ffmpeg error: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_cleanup_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let dir = TempDir::new_in(root.path()).unwrap();
        let wav = dir.path().join("audio.wav");
        std::fs::write(&wav, b"RIFF").unwrap();

        let artifact = AudioArtifact {
            path: wav.clone(),
            _dir: dir,
        };
        assert!(artifact.path().exists());

        drop(artifact);
        assert!(!wav.exists());
    }
}
