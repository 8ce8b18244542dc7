//! Stats command - read-only store statistics.

use crate::cli::Output;
use crate::config::Settings;
use crate::store::SqliteStore;
use anyhow::Result;

/// Run the stats command.
pub async fn run_stats(settings: Settings) -> Result<()> {
    let db_path = settings.db_path();
    if !db_path.exists() {
        Output::info("No knowledge database found. Process some videos first!");
        return Ok(());
    }

    let store = SqliteStore::new(&db_path)?;
    let stats = store.stats()?;

    Output::header("Store Statistics");
    Output::kv("Database", &db_path.display().to_string());
    Output::kv("Total videos", &stats.video_count.to_string());
    if let Some(title) = &stats.latest_title {
        Output::kv("Latest video", title);
    }

    Ok(())
}
