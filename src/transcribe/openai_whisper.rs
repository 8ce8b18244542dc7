//! openai-whisper transcription backend.

use super::Transcriber;
use crate::audio::AudioArtifact;
use crate::error::{Result, VitenError};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, instrument};

/// Transcriber backed by the `whisper` CLI from the openai-whisper package.
pub struct OpenaiWhisperTranscriber {
    model: String,
}

impl OpenaiWhisperTranscriber {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Transcriber for OpenaiWhisperTranscriber {
    #[instrument(skip_all, fields(audio = ?audio.path()))]
    async fn transcribe(&self, audio: AudioArtifact) -> Result<String> {
        let output_dir = audio.path().parent().ok_or_else(|| {
            VitenError::Transcription("audio artifact has no parent directory".into())
        })?;

        info!("Transcribing {:?} with openai-whisper ({})", audio.path(), self.model);

        let result = Command::new("whisper")
            .arg(audio.path())
            .arg("--model").arg(&self.model)
            .arg("--output_format").arg("txt")
            .arg("--output_dir").arg(output_dir)
            .arg("--verbose").arg("False")
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VitenError::ToolNotFound("whisper".into()));
            }
            Err(e) => {
                return Err(VitenError::Transcription(format!(
                    "whisper execution failed: {e}"
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VitenError::Transcription(format!(
                "whisper failed: {stderr}"
            )));
        }

        // whisper names the output after the input stem
        let transcript_path = audio.path().with_extension("txt");
        let text = std::fs::read_to_string(&transcript_path).map_err(|e| {
            VitenError::Transcription(format!(
                "missing transcript output {:?}: {e}",
                transcript_path
            ))
        })?;

        Ok(text.trim().to_string())
    }
}
