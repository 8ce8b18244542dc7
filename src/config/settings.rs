//! Configuration settings for Viten.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub database: DatabaseSettings,
    pub transcription: TranscriptionSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Directory for temporary audio artifacts.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.viten".to_string(),
            temp_dir: "/tmp/viten".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Path to the SQLite knowledge database.
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "~/.viten/knowledge.db".to_string(),
        }
    }
}

/// Speech-recognition backend.
///
/// Resolved once at startup and passed explicitly to the transcriber.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TranscriptionEngine {
    /// whisper.cpp's `whisper-cli` binary with ggml models.
    WhisperCpp,
    /// The `whisper` CLI from the openai-whisper package.
    OpenaiWhisper,
}

impl TranscriptionEngine {
    /// Platform default: whisper.cpp on macOS, openai-whisper elsewhere.
    pub fn default_for_platform() -> Self {
        if cfg!(target_os = "macos") {
            TranscriptionEngine::WhisperCpp
        } else {
            TranscriptionEngine::OpenaiWhisper
        }
    }
}

impl Default for TranscriptionEngine {
    fn default() -> Self {
        Self::default_for_platform()
    }
}

impl std::str::FromStr for TranscriptionEngine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "whisper-cpp" | "whispercpp" | "whisper.cpp" => Ok(TranscriptionEngine::WhisperCpp),
            "openai-whisper" | "whisper" => Ok(TranscriptionEngine::OpenaiWhisper),
            _ => Err(format!("Unknown transcription engine: {}", s)),
        }
    }
}

impl std::fmt::Display for TranscriptionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptionEngine::WhisperCpp => write!(f, "whisper-cpp"),
            TranscriptionEngine::OpenaiWhisper => write!(f, "openai-whisper"),
        }
    }
}

/// Transcription service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Speech-recognition engine.
    pub engine: TranscriptionEngine,
    /// Model identifier, interpreted by the engine (e.g. "base.en").
    pub model: String,
    /// Directory holding ggml model files for whisper.cpp.
    pub models_dir: String,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            engine: TranscriptionEngine::default_for_platform(),
            model: "base.en".to_string(),
            models_dir: "~/.viten/models".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or the default location if None.
    ///
    /// A missing file yields defaults. Environment overrides are applied
    /// after the file, each independently.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Apply `VITEN_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("VITEN_DB_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
        if let Ok(level) = std::env::var("VITEN_LOG_LEVEL") {
            if !level.is_empty() {
                self.general.log_level = level;
            }
        }
        if let Ok(engine) = std::env::var("VITEN_ENGINE") {
            match engine.parse() {
                Ok(engine) => self.transcription.engine = engine,
                Err(e) => tracing::warn!("Ignoring VITEN_ENGINE: {}", e),
            }
        }
        if let Ok(model) = std::env::var("VITEN_MODEL") {
            if !model.is_empty() {
                self.transcription.model = model;
            }
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::VitenError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("viten")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }

    /// Get the expanded database path.
    pub fn db_path(&self) -> PathBuf {
        Self::expand_path(&self.database.path)
    }

    /// Get the expanded whisper.cpp models directory.
    pub fn models_dir(&self) -> PathBuf {
        Self::expand_path(&self.transcription.models_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_from_str() {
        assert_eq!(
            "whisper-cpp".parse::<TranscriptionEngine>().unwrap(),
            TranscriptionEngine::WhisperCpp
        );
        assert_eq!(
            "whisper".parse::<TranscriptionEngine>().unwrap(),
            TranscriptionEngine::OpenaiWhisper
        );
        assert!("vosk".parse::<TranscriptionEngine>().is_err());
    }

    #[test]
    fn test_settings_parse_toml() {
        let toml_str = r#"
            [database]
            path = "/data/kb.db"

            [transcription]
            engine = "openai-whisper"
            model = "small.en"
        "#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.database.path, "/data/kb.db");
        assert_eq!(
            settings.transcription.engine,
            TranscriptionEngine::OpenaiWhisper
        );
        assert_eq!(settings.transcription.model, "small.en");
        // Unset sections fall back to defaults
        assert_eq!(settings.general.log_level, "info");
    }
}
