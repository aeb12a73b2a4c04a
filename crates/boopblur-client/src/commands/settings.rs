use anyhow::{Context, Result};
use boopblur_shared::{DeletionPolicy, Settings};
use clap::Subcommand;
use tracing::warn;

use super::print_json;
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the current settings.
    Show,

    /// Choose the vibe pack used for new captures.
    SetPack {
        pack: String,
    },

    /// Choose the deletion policy (off, keep-4-weeks, delete-14-days).
    SetPolicy {
        policy: String,
    },

    /// Restore the default settings.
    Reset,
}

pub async fn handle_settings_command(
    cmd: SettingsCommand,
    state: &mut AppState,
    json: bool,
) -> Result<()> {
    let settings = match cmd {
        SettingsCommand::Show => state.settings.current().await,
        SettingsCommand::SetPack { pack } => {
            if state.catalog.get(&pack).is_none() {
                warn!(pack = %pack, "unknown vibe pack, captures will use the default pack");
            }
            state.settings.set_active_vibe_pack(pack).await?
        }
        SettingsCommand::SetPolicy { policy } => {
            let policy: DeletionPolicy = policy
                .parse()
                .context("Expected one of: off, keep-4-weeks, delete-14-days")?;
            state.settings.set_deletion_policy(policy).await?
        }
        SettingsCommand::Reset => state.settings.reset().await?,
    };

    print_settings(state, &settings, json)
}

fn print_settings(state: &AppState, settings: &Settings, json: bool) -> Result<()> {
    if json {
        return print_json(settings);
    }
    let pack_name = state
        .catalog
        .get(&settings.active_vibe_pack)
        .map(|p| p.name.as_str())
        .unwrap_or("unknown");
    println!(
        "Vibe pack:       {} ({pack_name})",
        settings.active_vibe_pack
    );
    println!("Deletion policy: {}", settings.deletion_policy);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use tempfile::TempDir;

    async fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = ClientConfig {
            db_path: Some(dir.path().join("boops.db")),
            ..ClientConfig::default()
        };
        let state = AppState::init(config).await.unwrap();
        (state, dir)
    }

    #[tokio::test]
    async fn test_set_policy_rejects_unknown_value() {
        let (mut state, _dir) = test_state().await;
        let cmd = SettingsCommand::SetPolicy {
            policy: "delete-yesterday".into(),
        };
        assert!(handle_settings_command(cmd, &mut state, true).await.is_err());
        assert_eq!(state.settings.deletion_policy().await, DeletionPolicy::Off);
    }

    #[tokio::test]
    async fn test_set_policy_and_pack() {
        let (mut state, _dir) = test_state().await;
        handle_settings_command(
            SettingsCommand::SetPolicy {
                policy: "keep-4-weeks".into(),
            },
            &mut state,
            true,
        )
        .await
        .unwrap();
        handle_settings_command(
            SettingsCommand::SetPack {
                pack: "gremlin-hours".into(),
            },
            &mut state,
            true,
        )
        .await
        .unwrap();

        let current = state.settings.current().await;
        assert_eq!(current.deletion_policy, DeletionPolicy::Keep4Weeks);
        assert_eq!(current.active_vibe_pack, "gremlin-hours");
    }
}
