//! Viten - Video Transcript Knowledge Base
//!
//! A CLI tool for ingesting videos into a searchable transcript store.
//!
//! The name "Viten" comes from the Norwegian word for "knowledge."
//!
//! # Overview
//!
//! Viten allows you to:
//! - Ingest YouTube videos, local video files, and M3U8 streams
//! - Reuse existing YouTube captions, or transcribe audio with Whisper
//! - Deduplicate by a stable content identifier so nothing is stored twice
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `ident` - Dedup key derivation
//! - `source` - Video source abstraction (YouTube, local files, M3U8)
//! - `audio` - Audio materialization (download/convert to WAV)
//! - `transcribe` - Speech-to-text transcription
//! - `store` - Persistent video record store
//! - `pipeline` - Ingestion orchestration
//!
//! # Example
//!
//! ```rust,no_run
//! use viten::config::Settings;
//! use viten::pipeline::Ingestor;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let ingestor = Ingestor::new(&settings)?;
//!
//!     // Process every target listed in a manifest
//!     let summary = ingestor.run_manifest("youtube-talks.txt".as_ref()).await?;
//!     println!("{} persisted, {} skipped", summary.persisted, summary.skipped);
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod ident;
pub mod pipeline;
pub mod source;
pub mod store;
pub mod transcribe;

pub use error::{Result, VitenError};
