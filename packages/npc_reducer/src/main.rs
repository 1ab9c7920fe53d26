use std::path::PathBuf;

use clap::Parser;

use npc_reducer::SAMPLE_SIZE;
use npc_reducer::reduce_file;
use tool_common::DiskFs;

/// Halve the NPCs of every crowded home location in an NPC data file.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// JSON array of NPC records, rewritten in place.
    #[arg(value_name = "NPCS_JSON", default_value = "Data/NPCs.json")]
    path: PathBuf,
    /// Report what would be kept without rewriting the file.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    tool_common::logging::init();
    let cli = Cli::parse();

    let reduction = reduce_file(&DiskFs, &cli.path, !cli.dry_run)?;
    println!("Original NPC count: {}", reduction.original_count());
    println!("New NPC count: {}", reduction.retained_count());
    println!("\nSome sample home location counts (before -> after):");
    for (key, before, after) in reduction.changed_sample(SAMPLE_SIZE) {
        println!("Location {key}: {before} -> {after}");
    }
    Ok(())
}
