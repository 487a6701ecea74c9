//! `confetti watch`: foreground watcher that syncs components on change and
//! reloads the Map template when `.confetti-templates/` changes.

use anyhow::{Context, Result};
use clap::Args;

use confetti_daemon::{start_blocking, WatchOptions};

use super::project::ProjectArgs;

/// Arguments for `confetti watch`.
#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Resync the standard hidden set before watching.
    #[arg(long)]
    pub standard: bool,
}

impl WatchArgs {
    pub fn run(self) -> Result<()> {
        let config = self.project.sync_config()?;
        let options = WatchOptions {
            verbose: self.project.verbose,
            standard_on_start: self.standard,
        };
        start_blocking(&self.project.root, &config, options).context("watcher exited with error")
    }
}
