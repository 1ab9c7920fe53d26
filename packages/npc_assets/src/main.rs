use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use npc_assets::normalize;
use tool_common::DiskFs;

/// Fix misnamed NPC imageset folders, their images and Contents.json files.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Directory holding the `npc<id>.imageset` folders.
    #[arg(value_name = "ASSETS_DIR")]
    path: PathBuf,
    /// Print the full report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tool_common::logging::init();
    let cli = Cli::parse();
    info!("Target path: {}", cli.path.display());

    let report = normalize(&DiskFs, &cli.path)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("Finished processing {} items in the directory.", report.scanned);
    match report.corrected_count() {
        0 => println!("No corrections made (or all relevant items were already correct)."),
        count => println!("Made {count} corrections."),
    }
    if !report.errors.is_empty() {
        println!("{} folders failed:", report.errors.len());
        for message in &report.errors {
            println!("  {message}");
        }
    }
    Ok(())
}
