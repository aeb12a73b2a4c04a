//! User settings service.
//!
//! Holds the in-memory copy of [`Settings`] and writes every change through
//! to the store before updating memory, so a failed write leaves the
//! previous value in place.

use std::sync::Arc;

use boopblur_shared::constants::SETTINGS_RECORD_KEY;
use boopblur_shared::{DeletionPolicy, Settings};
use boopblur_store::ArtifactStore;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::Result;
use crate::records;

pub struct SettingsService {
    store: Arc<ArtifactStore>,
    defaults: Settings,
    current: RwLock<Settings>,
}

impl SettingsService {
    /// Service with `defaults` in memory. Call [`SettingsService::load`] to
    /// pick up persisted values.
    pub fn new(store: Arc<ArtifactStore>, defaults: Settings) -> Self {
        Self {
            store,
            current: RwLock::new(defaults.clone()),
            defaults,
        }
    }

    /// Replace the in-memory settings with the persisted record, or the
    /// defaults when it is absent or unreadable.
    pub async fn load(&self) -> Result<Settings> {
        let loaded =
            records::load_or(&self.store, SETTINGS_RECORD_KEY, self.defaults.clone()).await?;
        *self.current.write().await = loaded.clone();
        Ok(loaded)
    }

    pub async fn current(&self) -> Settings {
        self.current.read().await.clone()
    }

    pub async fn deletion_policy(&self) -> DeletionPolicy {
        self.current.read().await.deletion_policy.clone()
    }

    pub async fn active_vibe_pack(&self) -> String {
        self.current.read().await.active_vibe_pack.clone()
    }

    pub async fn set_active_vibe_pack(&self, pack_id: impl Into<String>) -> Result<Settings> {
        let pack_id = pack_id.into();
        let updated = self
            .update(|s| s.active_vibe_pack = pack_id.clone())
            .await?;
        info!(pack = %pack_id, "active vibe pack changed");
        Ok(updated)
    }

    pub async fn set_deletion_policy(&self, policy: DeletionPolicy) -> Result<Settings> {
        let updated = self.update(|s| s.deletion_policy = policy.clone()).await?;
        info!(policy = %policy, "deletion policy changed");
        Ok(updated)
    }

    /// Persist and adopt the defaults.
    pub async fn reset(&self) -> Result<Settings> {
        let defaults = self.defaults.clone();
        self.update(|s| *s = defaults).await
    }

    async fn update<F>(&self, change: F) -> Result<Settings>
    where
        F: FnOnce(&mut Settings),
    {
        let mut guard = self.current.write().await;
        let mut next = guard.clone();
        change(&mut next);
        records::save(&self.store, SETTINGS_RECORD_KEY, &next).await?;
        *guard = next.clone();
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (Arc<ArtifactStore>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(ArtifactStore::new(dir.path().join("boops.db")));
        (store, dir)
    }

    #[tokio::test]
    async fn test_absent_record_gives_defaults() {
        let (store, _dir) = test_store();
        let service = SettingsService::new(store, Settings::default());
        assert_eq!(service.load().await.unwrap(), Settings::default());
    }

    #[tokio::test]
    async fn test_corrupt_record_gives_defaults() {
        let (store, _dir) = test_store();
        store
            .save_record(SETTINGS_RECORD_KEY, "[1, 2")
            .await
            .unwrap();

        let defaults = Settings {
            active_vibe_pack: "soft-launch".into(),
            deletion_policy: DeletionPolicy::Keep4Weeks,
        };
        let service = SettingsService::new(store, defaults.clone());
        assert_eq!(service.load().await.unwrap(), defaults);
        assert_eq!(service.current().await, defaults);
    }

    #[tokio::test]
    async fn test_partial_record_keeps_configured_defaults() {
        let (store, _dir) = test_store();
        store
            .save_record(SETTINGS_RECORD_KEY, r#"{"activeVibePack":"soft-launch"}"#)
            .await
            .unwrap();

        let defaults = Settings {
            active_vibe_pack: "zen-but-dumb".into(),
            deletion_policy: DeletionPolicy::Delete14Days,
        };
        let service = SettingsService::new(store, defaults);
        let settings = service.load().await.unwrap();
        assert_eq!(settings.active_vibe_pack, "soft-launch");
        assert_eq!(settings.deletion_policy, DeletionPolicy::Delete14Days);
        assert_eq!(service.deletion_policy().await, DeletionPolicy::Delete14Days);
    }

    #[tokio::test]
    async fn test_changes_persist_across_reload() {
        let (store, _dir) = test_store();
        let service = SettingsService::new(store.clone(), Settings::default());
        service.load().await.unwrap();

        service.set_active_vibe_pack("gremlin-hours").await.unwrap();
        service
            .set_deletion_policy(DeletionPolicy::Delete14Days)
            .await
            .unwrap();

        let reloaded = SettingsService::new(store, Settings::default());
        let settings = reloaded.load().await.unwrap();
        assert_eq!(settings.active_vibe_pack, "gremlin-hours");
        assert_eq!(settings.deletion_policy, DeletionPolicy::Delete14Days);
        assert_eq!(reloaded.deletion_policy().await, DeletionPolicy::Delete14Days);
    }

    #[tokio::test]
    async fn test_unrecognized_policy_survives_reload() {
        let (store, _dir) = test_store();
        store
            .save_record(
                SETTINGS_RECORD_KEY,
                r#"{"activeVibePack":"zen-but-dumb","deletionPolicy":"delete-1-day"}"#,
            )
            .await
            .unwrap();

        let service = SettingsService::new(store, Settings::default());
        let settings = service.load().await.unwrap();
        assert_eq!(
            settings.deletion_policy,
            DeletionPolicy::Unrecognized("delete-1-day".into())
        );
        assert_eq!(settings.deletion_policy.max_age_days(), None);
    }

    #[tokio::test]
    async fn test_reset_persists_defaults() {
        let (store, _dir) = test_store();
        let service = SettingsService::new(store.clone(), Settings::default());
        service.set_active_vibe_pack("soft-launch").await.unwrap();
        service.reset().await.unwrap();
        assert_eq!(service.active_vibe_pack().await, "zen-but-dumb");

        let reloaded = SettingsService::new(store, Settings::default());
        assert_eq!(reloaded.load().await.unwrap(), Settings::default());
    }
}
