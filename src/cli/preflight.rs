//! Pre-flight checks before expensive operations.
//!
//! Validates that required external tools are available before starting
//! operations that would otherwise fail midway.

use crate::config::{Settings, TranscriptionEngine};
use crate::error::{Result, VitenError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Ingestion requires download, conversion, and transcription tools.
    Ingest,
    /// Statistics only read the store.
    Stats,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Ingest => {
            check_tool("yt-dlp")?;
            check_tool("ffmpeg")?;
            check_tool(engine_binary(settings.transcription.engine))?;
        }
        Operation::Stats => {
            // No external requirements for reading the store
        }
    }
    Ok(())
}

/// Binary name for the configured transcription engine.
pub fn engine_binary(engine: TranscriptionEngine) -> &'static str {
    match engine {
        TranscriptionEngine::WhisperCpp => "whisper-cli",
        TranscriptionEngine::OpenaiWhisper => "whisper",
    }
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    // ffmpeg uses -version (single dash), others use --version
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(VitenError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(VitenError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(VitenError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_has_no_requirements() {
        let settings = Settings::default();
        assert!(check(Operation::Stats, &settings).is_ok());
    }

    #[test]
    fn test_engine_binary_names() {
        assert_eq!(engine_binary(TranscriptionEngine::WhisperCpp), "whisper-cli");
        assert_eq!(engine_binary(TranscriptionEngine::OpenaiWhisper), "whisper");
    }
}
