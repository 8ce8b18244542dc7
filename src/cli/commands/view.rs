//! View command - launch the Datasette viewer on the store.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the view command.
pub async fn run_view(port: u16, settings: Settings) -> Result<()> {
    if preflight::check_tool("datasette").is_err() {
        Output::error("Datasette not found. Install with:");
        Output::info("  pip install datasette");
        anyhow::bail!("datasette not available");
    }

    let db_path = settings.db_path();
    if !db_path.exists() {
        Output::error("No knowledge database found. Process some videos first!");
        anyhow::bail!("database not found at {:?}", db_path);
    }

    Output::info(&format!(
        "Launching Datasette on port {} for {}",
        port,
        db_path.display()
    ));

    // Runs until the user interrupts it
    let status = tokio::process::Command::new("datasette")
        .arg(&db_path)
        .arg("--port")
        .arg(port.to_string())
        .arg("-o")
        .status()
        .await?;

    if !status.success() {
        Output::warning(&format!("Datasette exited with status: {}", status));
    }

    Ok(())
}
