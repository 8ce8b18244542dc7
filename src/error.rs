//! Error types for Viten.

use thiserror::Error;

/// Library-level error type for Viten operations.
#[derive(Error, Debug)]
pub enum VitenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed URL: {0}")]
    MalformedUrl(String),

    #[error("Metadata extraction failed: {0}")]
    MetadataExtraction(String),

    #[error("Audio materialization failed: {0}")]
    AudioMaterialization(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Unsupported source kind: {0}")]
    UnsupportedSourceKind(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),
}

/// Result type alias for Viten operations.
pub type Result<T> = std::result::Result<T, VitenError>;
