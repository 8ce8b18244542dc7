//! CLI module for Viten.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Viten - Video Transcript Knowledge Base
///
/// A CLI tool for ingesting videos from YouTube, local files, and M3U8
/// streams into a searchable transcript store. The name "Viten" comes from
/// the Norwegian word for "knowledge."
#[derive(Parser, Debug)]
#[command(name = "viten")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Show what would be processed without actually processing
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a batch of videos from a manifest file
    ///
    /// The manifest filename prefix selects the source kind:
    /// youtube-*.txt, local-*.txt, or m3u8-*.txt.
    Ingest {
        /// Path to the manifest file
        manifest: String,
    },

    /// Ingest a single YouTube video
    Youtube {
        /// Video URL (must carry a v= parameter)
        url: String,

        /// Explicit title; skips remote metadata extraction
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Ingest a single local video file
    Local {
        /// Path to the video file
        path: String,

        /// Explicit title; defaults to the file name
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Ingest a single M3U8 stream
    M3u8 {
        /// Stream URL
        url: String,

        /// Explicit title
        #[arg(short, long)]
        title: Option<String>,

        /// Position within a lesson sequence
        #[arg(short, long, default_value = "1")]
        order: u32,
    },

    /// Ingest videos described in a YAML batch file
    Batch {
        /// Path to the YAML config listing per-kind entries
        config_file: String,
    },

    /// Show store statistics
    Stats,

    /// Launch the Datasette viewer on the store
    View {
        /// Port for the Datasette server
        #[arg(short, long, default_value = "8001")]
        port: u16,
    },

    /// Check external tool requirements and configuration
    Doctor,
}
