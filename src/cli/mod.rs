use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::event::HostEvent;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Verbosity of the command output.
    #[arg(long)]
    pub verbose: Option<LevelFilter>,

    /// Path to the backup settings file.
    #[arg(long, short = 'c', default_value = "mc-backup.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand, Debug)]
pub enum Action {
    /// Deliver a host event, running a backup cycle if it matches the
    /// configured trigger.
    Trigger {
        /// The event the host raised.
        #[arg(value_enum)]
        event: HostEvent,
    },

    /// Run one backup cycle right away, ignoring the configured trigger.
    Backup,
}
