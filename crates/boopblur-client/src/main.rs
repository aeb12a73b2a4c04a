//! boopblur CLI entry point.
//!
//! Usage:
//!   boopblur capture photo.jpg
//!   boopblur list --week
//!   BOOPBLUR_DEFAULT_POLICY=delete-14-days boopblur watch
//!
//! See [`boopblur_client::config::ClientConfig`] for environment variables.

use boopblur_client::commands::{self, Cli};
use boopblur_client::config::ClientConfig;
use boopblur_client::state::AppState;
use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    boopblur_client::init_tracing(cli.verbose);

    let mut config = ClientConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }
    debug!(?config, "configuration loaded");

    let mut state = AppState::init(config).await?;
    commands::dispatch(cli.command, &mut state, cli.json).await
}
