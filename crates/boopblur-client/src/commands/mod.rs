//! CLI command definitions and dispatch for the `boopblur` binary.
//!
//! Each sub-module groups related commands by domain and exposes one
//! `handle_*` entry point taking the parsed arguments and the shared
//! [`AppState`].

pub mod artifacts;
pub mod settings;
pub mod trace;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::state::AppState;

/// One photo a day, slowly blurring away.
#[derive(Parser, Debug)]
#[command(name = "boopblur", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database file (overrides BOOPBLUR_DB_PATH).
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Output machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// More logging (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture a photo from a file.
    Capture {
        /// Image file to store.
        file: PathBuf,

        /// Vibe pack for the spark line (defaults to the active pack).
        #[arg(long)]
        pack: Option<String>,

        /// Capture time in milliseconds since the epoch (defaults to now).
        #[arg(long, value_name = "MS")]
        at: Option<i64>,
    },

    /// List captured photos.
    #[command(alias = "ls")]
    List {
        /// Only this ISO week.
        #[arg(long, conflicts_with = "today")]
        week: bool,

        /// Only today.
        #[arg(long)]
        today: bool,
    },

    /// Show one photo.
    Show {
        id: String,
    },

    /// Delete one photo.
    #[command(alias = "rm")]
    Delete {
        id: String,
    },

    /// Apply the deletion policy once.
    Cleanup,

    /// Delete every photo.
    Clear {
        /// Required to actually delete.
        #[arg(long)]
        yes: bool,
    },

    /// Run cleanup periodically until Ctrl+C.
    Watch {
        /// Seconds between passes (defaults to BOOPBLUR_CLEANUP_INTERVAL_SECS).
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },

    /// Show or change settings.
    Settings {
        #[command(subcommand)]
        action: settings::SettingsCommand,
    },

    /// Show or reset the capture counter.
    Trace {
        #[command(subcommand)]
        action: trace::TraceCommand,
    },
}

/// Run the parsed command against `state`.
pub async fn dispatch(command: Commands, state: &mut AppState, json: bool) -> Result<()> {
    match command {
        Commands::Capture { file, pack, at } => {
            artifacts::capture(state, &file, pack.as_deref(), at, json).await
        }
        Commands::List { week, today } => artifacts::list(state, week, today, json).await,
        Commands::Show { id } => artifacts::show(state, &id, json).await,
        Commands::Delete { id } => artifacts::delete(state, &id, json).await,
        Commands::Cleanup => artifacts::cleanup(state, json).await,
        Commands::Clear { yes } => artifacts::clear(state, yes, json).await,
        Commands::Watch { interval } => artifacts::watch(state, interval, json).await,
        Commands::Settings { action } => settings::handle_settings_command(action, state, json).await,
        Commands::Trace { action } => trace::handle_trace_command(action, state, json).await,
    }
}

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
