//! Client configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the client can start with zero
//! configuration.

use std::path::PathBuf;

use boopblur_shared::constants::{DEFAULT_CLEANUP_INTERVAL_SECS, DEFAULT_VIBE_PACK};
use boopblur_shared::{DecayTable, DeletionPolicy, Settings};
use boopblur_store::Database;

use crate::error::Result;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// SQLite database file.
    /// Env: `BOOPBLUR_DB_PATH`
    /// Default: platform data directory (see [`Database::default_path`]).
    pub db_path: Option<PathBuf>,

    /// Deletion policy used when no settings have been persisted.
    /// Env: `BOOPBLUR_DEFAULT_POLICY` (`off`, `keep-4-weeks`, `delete-14-days`)
    /// Default: `off`
    pub default_deletion_policy: DeletionPolicy,

    /// Vibe pack used when no settings have been persisted.
    /// Env: `BOOPBLUR_DEFAULT_VIBE_PACK`
    /// Default: `"zen-but-dumb"`
    pub default_vibe_pack: String,

    /// Decay thresholds, e.g. `0:crisp,1:slight-blur,3:more-blur`.
    /// Env: `BOOPBLUR_DECAY_TABLE`
    pub decay_table: DecayTable,

    /// Seconds between cleanup passes in `watch` mode.
    /// Env: `BOOPBLUR_CLEANUP_INTERVAL_SECS`
    /// Default: `3600`
    pub cleanup_interval_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            default_deletion_policy: DeletionPolicy::Off,
            default_vibe_pack: DEFAULT_VIBE_PACK.to_string(),
            decay_table: DecayTable::default(),
            cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("BOOPBLUR_DB_PATH").filter(|p| !p.is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(raw) = lookup("BOOPBLUR_DEFAULT_POLICY") {
            match raw.parse::<DeletionPolicy>() {
                Ok(policy) => config.default_deletion_policy = policy,
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid BOOPBLUR_DEFAULT_POLICY, using default");
                }
            }
        }

        if let Some(pack) = lookup("BOOPBLUR_DEFAULT_VIBE_PACK").filter(|p| !p.is_empty()) {
            config.default_vibe_pack = pack;
        }

        if let Some(raw) = lookup("BOOPBLUR_DECAY_TABLE") {
            match raw.parse::<DecayTable>() {
                Ok(table) => config.decay_table = table,
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid BOOPBLUR_DECAY_TABLE, using default");
                }
            }
        }

        if let Some(raw) = lookup("BOOPBLUR_CLEANUP_INTERVAL_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.cleanup_interval_secs = secs,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        "Invalid BOOPBLUR_CLEANUP_INTERVAL_SECS, using default"
                    );
                }
            }
        }

        config
    }

    /// Settings used when nothing valid is persisted.
    pub fn default_settings(&self) -> Settings {
        Settings {
            active_vibe_pack: self.default_vibe_pack.clone(),
            deletion_policy: self.default_deletion_policy.clone(),
        }
    }

    /// Configured database path, or the platform default.
    pub fn resolve_db_path(&self) -> Result<PathBuf> {
        match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Database::default_path()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.db_path.is_none());
        assert_eq!(config.default_deletion_policy, DeletionPolicy::Off);
        assert_eq!(config.default_vibe_pack, DEFAULT_VIBE_PACK);
        assert_eq!(config.cleanup_interval_secs, DEFAULT_CLEANUP_INTERVAL_SECS);
        assert_eq!(config.decay_table, DecayTable::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("BOOPBLUR_DB_PATH", "/tmp/boops.db"),
            ("BOOPBLUR_DEFAULT_POLICY", "delete-14-days"),
            ("BOOPBLUR_DEFAULT_VIBE_PACK", "gremlin-hours"),
            ("BOOPBLUR_DECAY_TABLE", "0:sharp,10:gone"),
            ("BOOPBLUR_CLEANUP_INTERVAL_SECS", "60"),
        ]));

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/boops.db")));
        assert_eq!(config.default_deletion_policy, DeletionPolicy::Delete14Days);
        assert_eq!(config.default_vibe_pack, "gremlin-hours");
        assert_eq!(config.decay_table.states().len(), 2);
        assert_eq!(config.cleanup_interval_secs, 60);

        let settings = config.default_settings();
        assert_eq!(settings.active_vibe_pack, "gremlin-hours");
        assert_eq!(settings.deletion_policy, DeletionPolicy::Delete14Days);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("BOOPBLUR_DEFAULT_POLICY", "delete-yesterday"),
            ("BOOPBLUR_DECAY_TABLE", "5:b,1:a"),
            ("BOOPBLUR_CLEANUP_INTERVAL_SECS", "0"),
            ("BOOPBLUR_DB_PATH", ""),
        ]));

        assert!(config.db_path.is_none());
        assert_eq!(config.default_deletion_policy, DeletionPolicy::Off);
        assert_eq!(config.decay_table, DecayTable::default());
        assert_eq!(config.cleanup_interval_secs, DEFAULT_CLEANUP_INTERVAL_SECS);
    }

    #[test]
    fn test_resolve_explicit_path() {
        let config = ClientConfig {
            db_path: Some(PathBuf::from("/data/boops.db")),
            ..ClientConfig::default()
        };
        assert_eq!(
            config.resolve_db_path().unwrap(),
            PathBuf::from("/data/boops.db")
        );
    }
}
