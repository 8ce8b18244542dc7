//! Configuration module for Viten.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    DatabaseSettings, GeneralSettings, Settings, TranscriptionEngine, TranscriptionSettings,
};
