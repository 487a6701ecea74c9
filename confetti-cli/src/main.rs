//! Confetti: keep the hidden `.confetti/` mirror of a project in sync.
//!
//! # Usage
//!
//! ```text
//! confetti sync component <file> [--root <dir>] [--host <host>] [--env <name>] [--verbose]
//! confetti sync map [--root <dir>] [--verbose]
//! confetti sync standard [--root <dir>] [--host <host>] [--env <name>] [--verbose]
//! confetti status [--root <dir>] [--json]
//! confetti watch [--root <dir>] [--host <host>] [--env <name>] [--standard] [--verbose]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{status::StatusArgs, sync::SyncCommand, watch::WatchArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "confetti",
    version,
    about = "Mirror hidden Confetti components into the local project",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch and write hidden artifacts once.
    Sync {
        #[command(subcommand)]
        command: SyncCommand,
    },

    /// Show mirrored components and whether Map.php is current.
    Status(StatusArgs),

    /// Watch the project and sync components as they change.
    Watch(WatchArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Sync { command } => commands::sync::run(command),
        Commands::Status(args) => args.run(),
        Commands::Watch(args) => args.run(),
    }
}
