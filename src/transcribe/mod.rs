//! Speech-to-text transcription.
//!
//! Two CLI-backed engines are supported: whisper.cpp (`whisper-cli`) and
//! openai-whisper (`whisper`). The engine is resolved once at startup from
//! configuration and passed explicitly; there is no per-call selection.

mod openai_whisper;
mod whisper_cpp;

pub use openai_whisper::OpenaiWhisperTranscriber;
pub use whisper_cpp::WhisperCppTranscriber;

use crate::audio::AudioArtifact;
use crate::config::{Settings, TranscriptionEngine};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for transcription backends.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio artifact and return the text.
    ///
    /// Consumes the artifact: the underlying WAV is deleted when this call
    /// returns, on success and on failure alike.
    async fn transcribe(&self, audio: AudioArtifact) -> Result<String>;
}

/// Build the configured transcription backend.
pub fn create_transcriber(settings: &Settings) -> Arc<dyn Transcriber> {
    match settings.transcription.engine {
        TranscriptionEngine::WhisperCpp => Arc::new(WhisperCppTranscriber::new(
            &settings.transcription.model,
            settings.models_dir(),
        )),
        TranscriptionEngine::OpenaiWhisper => {
            Arc::new(OpenaiWhisperTranscriber::new(&settings.transcription.model))
        }
    }
}
