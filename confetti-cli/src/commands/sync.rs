//! `confetti sync`: one-shot component, Map and standard-set syncs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use confetti_sync::{SyncConfig, SyncOutcome, Synchronizer, WriteResult};

use super::project::ProjectArgs;

#[derive(Subcommand, Debug)]
pub enum SyncCommand {
    /// Mirror the component behind a changed file and rebuild the Map.
    Component(ComponentArgs),
    /// Rebuild Components/Map.php from the mirrored components.
    Map(MapArgs),
    /// Fetch and write the standard hidden set.
    Standard(ProjectArgs),
}

#[derive(Args, Debug)]
pub struct ComponentArgs {
    /// Changed file, relative to the project root.
    pub file: String,

    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args, Debug)]
pub struct MapArgs {
    /// Project root.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Print the path of the saved Map.
    #[arg(long, short)]
    pub verbose: bool,
}

pub fn run(command: SyncCommand) -> Result<()> {
    confetti_daemon::init_tracing_with("warn");
    match command {
        SyncCommand::Component(args) => sync_component(args),
        SyncCommand::Map(args) => sync_map(args),
        SyncCommand::Standard(args) => sync_standard(args),
    }
}

fn sync_component(args: ComponentArgs) -> Result<()> {
    let synchronizer = args.project.synchronizer()?;
    let outcome = synchronizer
        .upsert_hidden_component(&args.file, args.project.verbose)
        .with_context(|| format!("sync failed for '{}'", args.file))?;

    match outcome {
        SyncOutcome::NotRelevant => {
            println!("· '{}' is not a component file, nothing to do", args.file);
        }
        SyncOutcome::Synced {
            component,
            component_write,
            map_write,
        } => {
            println!("✓ '{component}' synced");
            print_writes(&[component_write, map_write]);
        }
    }
    Ok(())
}

fn sync_map(args: MapArgs) -> Result<()> {
    // Map rebuilds never reach the service.
    let synchronizer = Synchronizer::with_http(&args.root, &SyncConfig::default())
        .with_context(|| format!("failed to prepare sync for {}", args.root.display()))?;
    let write = synchronizer
        .upsert_hidden_map(args.verbose)
        .context("Map rebuild failed")?;
    println!("✓ Map rebuilt");
    print_writes(&[write]);
    Ok(())
}

fn sync_standard(args: ProjectArgs) -> Result<()> {
    let synchronizer = args.synchronizer()?;
    let writes = synchronizer
        .save_standard_hidden_files(args.verbose)
        .context("standard sync failed")?;
    if writes.is_empty() {
        println!("✓ standard set is empty, nothing to do");
        return Ok(());
    }
    println!("✓ standard set synced ({} written)", writes.len());
    print_writes(&writes);
    Ok(())
}

fn print_writes(writes: &[WriteResult]) {
    for write in writes {
        println!("  ✎  {} ({} bytes)", write.path.display(), write.bytes);
    }
}
