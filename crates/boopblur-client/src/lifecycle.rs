//! Artifact lifecycle controller.
//!
//! [`ArtifactLifecycle`] owns the in-memory artifact cache and is the single
//! entry point for capturing, querying, removing and expiring artifacts. The
//! store stays the durable source of truth: the cache is replaced wholesale
//! on every [`ArtifactLifecycle::load`], so a cache left stale by an
//! interrupted operation heals on the next load.
//!
//! Week and day views are recomputed from the cache and the clock on every
//! call, so they follow calendar rollover without any invalidation.

use std::sync::Arc;

use boopblur_shared::{
    expired_ids, temporal, Artifact, DecayState, DecayTable, DeletionPolicy,
};
use boopblur_store::ArtifactStore;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::Result;
use crate::settings::SettingsService;

/// Outcome of one [`ArtifactLifecycle::run_cleanup`] pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub policy: DeletionPolicy,
    pub deleted: Vec<String>,
}

pub struct ArtifactLifecycle {
    store: Arc<ArtifactStore>,
    settings: Arc<SettingsService>,
    clock: Arc<dyn Clock>,
    decay: DecayTable,
    cache: Vec<Artifact>,
    loaded: bool,
}

impl ArtifactLifecycle {
    /// Controller with an empty, unloaded cache.
    pub fn new(
        store: Arc<ArtifactStore>,
        settings: Arc<SettingsService>,
        clock: Arc<dyn Clock>,
        decay: DecayTable,
    ) -> Self {
        Self {
            store,
            settings,
            clock,
            decay,
            cache: Vec::new(),
            loaded: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Cached artifacts in insertion order.
    pub fn artifacts(&self) -> &[Artifact] {
        &self.cache
    }

    /// Replace the cache with the store's full contents.
    pub async fn load(&mut self) -> Result<()> {
        let artifacts = self.store.get_all().await?;
        debug!(count = artifacts.len(), "artifact cache loaded");
        self.cache = artifacts;
        self.loaded = true;
        Ok(())
    }

    pub async fn ensure_loaded(&mut self) -> Result<()> {
        if !self.loaded {
            self.load().await?;
        }
        Ok(())
    }

    /// Capture a new photo now.
    pub async fn save(
        &mut self,
        blob: Vec<u8>,
        spark_pack_id: &str,
        spark_index: u32,
    ) -> Result<Artifact> {
        let now = self.clock.now_ms();
        self.save_at(blob, spark_pack_id, spark_index, now).await
    }

    /// Capture a new photo stamped with `at`.
    ///
    /// The returned artifact is exactly what was persisted.
    pub async fn save_at(
        &mut self,
        blob: Vec<u8>,
        spark_pack_id: &str,
        spark_index: u32,
        at: i64,
    ) -> Result<Artifact> {
        self.ensure_loaded().await?;

        let artifact = Artifact::photo(
            Uuid::new_v4().to_string(),
            at,
            blob,
            spark_pack_id,
            spark_index,
        );
        self.store.put(&artifact).await?;
        self.cache.push(artifact.clone());

        info!(id = %artifact.id, date = %artifact.iso_date, "artifact captured");
        Ok(artifact)
    }

    /// Delete `id` from the store, then from the cache. Absent ids are a no-op.
    pub async fn remove(&mut self, id: &str) -> Result<()> {
        self.ensure_loaded().await?;
        self.store.delete_by_id(id).await?;
        self.cache.retain(|a| a.id != id);
        Ok(())
    }

    /// Cached artifacts captured in the current ISO week.
    pub fn current_week(&self) -> Vec<&Artifact> {
        let key = temporal::week_key(self.clock.now_ms());
        self.cache.iter().filter(|a| a.week_key == key).collect()
    }

    /// Cached artifacts captured on the current calendar day.
    pub fn today(&self) -> Vec<&Artifact> {
        let key = temporal::day_key(self.clock.now_ms());
        self.cache.iter().filter(|a| a.iso_date == key).collect()
    }

    pub fn has_captured_today(&self) -> bool {
        !self.today().is_empty()
    }

    /// Reload from the store and delete everything the active deletion
    /// policy has expired, in one batch.
    ///
    /// Nothing is written when no artifact is expired.
    pub async fn run_cleanup(&mut self) -> Result<CleanupReport> {
        self.load().await?;

        let policy = self.settings.deletion_policy().await;
        let deleted = expired_ids(&self.cache, &policy, self.clock.now_ms());

        if deleted.is_empty() {
            debug!(policy = %policy, "cleanup: nothing expired");
            return Ok(CleanupReport { policy, deleted });
        }

        let removed = self.store.delete_batch(&deleted).await?;
        self.cache.retain(|a| !deleted.contains(&a.id));

        info!(policy = %policy, expired = deleted.len(), removed, "cleanup finished");
        Ok(CleanupReport { policy, deleted })
    }

    /// Remove every artifact from the store and the cache.
    pub async fn clear_all(&mut self) -> Result<usize> {
        let removed = self.store.clear_all().await?;
        self.cache.clear();
        self.loaded = true;
        Ok(removed)
    }

    /// Decay state `artifact` has reached at the current time.
    pub fn decay_of(&self, artifact: &Artifact) -> &DecayState {
        self.decay
            .classify(temporal::age_days(artifact.ts, self.clock.now_ms()))
    }

    /// Every cached artifact paired with its current decay state.
    pub fn decayed(&self) -> Vec<(&Artifact, &DecayState)> {
        self.cache.iter().map(|a| (a, self.decay_of(a))).collect()
    }
}
