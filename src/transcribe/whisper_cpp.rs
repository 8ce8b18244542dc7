//! whisper.cpp transcription backend.

use super::Transcriber;
use crate::audio::AudioArtifact;
use crate::error::{Result, VitenError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, instrument};

/// Transcriber backed by whisper.cpp's `whisper-cli` binary.
pub struct WhisperCppTranscriber {
    model: String,
    models_dir: PathBuf,
}

impl WhisperCppTranscriber {
    pub fn new(model: &str, models_dir: PathBuf) -> Self {
        Self {
            model: model.to_string(),
            models_dir,
        }
    }

    /// Path to the ggml model file for the configured model name.
    fn model_path(&self) -> PathBuf {
        self.models_dir.join(format!("ggml-{}.bin", self.model))
    }
}

#[async_trait]
impl Transcriber for WhisperCppTranscriber {
    #[instrument(skip_all, fields(audio = ?audio.path()))]
    async fn transcribe(&self, audio: AudioArtifact) -> Result<String> {
        let model_path = self.model_path();
        if !model_path.exists() {
            return Err(VitenError::Transcription(format!(
                "model not found: {:?}",
                model_path
            )));
        }

        // whisper-cli writes <base>.txt next to the requested output base;
        // the artifact's temp dir is writable and cleaned up with it.
        let output_base = audio.path().with_extension("");

        info!("Transcribing {:?} with whisper.cpp ({})", audio.path(), self.model);

        let result = Command::new("whisper-cli")
            .arg("-m").arg(&model_path)
            .arg("-f").arg(audio.path())
            .arg("-otxt")
            .arg("-of").arg(&output_base)
            .arg("-np")
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VitenError::ToolNotFound("whisper-cli".into()));
            }
            Err(e) => {
                return Err(VitenError::Transcription(format!(
                    "whisper-cli execution failed: {e}"
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VitenError::Transcription(format!(
                "whisper-cli failed: {stderr}"
            )));
        }

        let transcript_path = output_base.with_extension("txt");
        let text = std::fs::read_to_string(&transcript_path).map_err(|e| {
            VitenError::Transcription(format!(
                "missing transcript output {:?}: {e}",
                transcript_path
            ))
        })?;

        Ok(text.trim().to_string())
    }
}
