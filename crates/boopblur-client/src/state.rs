//! Application state shared by every CLI command.
//!
//! [`AppState`] wires the store, the settings and trace services, and the
//! lifecycle controller together around one clock.

use std::sync::Arc;

use boopblur_shared::{temporal, Artifact, VibeCatalog};
use boopblur_store::ArtifactStore;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::lifecycle::ArtifactLifecycle;
use crate::settings::SettingsService;
use crate::trace::TraceService;

pub struct AppState {
    pub config: ClientConfig,
    pub store: Arc<ArtifactStore>,
    pub settings: Arc<SettingsService>,
    pub trace: TraceService,
    pub lifecycle: ArtifactLifecycle,
    pub catalog: VibeCatalog,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Build the state on the system clock and load persisted settings
    /// and trace.
    pub async fn init(config: ClientConfig) -> Result<Self> {
        Self::init_with_clock(config, Arc::new(SystemClock)).await
    }

    pub async fn init_with_clock(config: ClientConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let store = Arc::new(ArtifactStore::new(config.resolve_db_path()?));
        let settings = Arc::new(SettingsService::new(
            store.clone(),
            config.default_settings(),
        ));
        let trace = TraceService::new(store.clone(), clock.clone());
        let lifecycle = ArtifactLifecycle::new(
            store.clone(),
            settings.clone(),
            clock.clone(),
            config.decay_table.clone(),
        );

        settings.load().await?;
        trace.load().await?;
        debug!(path = %store.path().display(), "app state initialised");

        Ok(Self {
            config,
            store,
            settings,
            trace,
            lifecycle,
            catalog: VibeCatalog::builtin(),
            clock,
        })
    }

    /// Capture `blob` with today's spark line from `pack` (or the active
    /// pack), then count the boop. A failure to count is logged; the
    /// stored artifact is still returned.
    ///
    /// `at` backdates the capture; the spark line follows the capture day.
    pub async fn capture(
        &mut self,
        blob: Vec<u8>,
        pack: Option<&str>,
        at: Option<i64>,
    ) -> Result<Artifact> {
        let pack_id = match pack {
            Some(p) => p.to_string(),
            None => self.settings.active_vibe_pack().await,
        };
        let ts = at.unwrap_or_else(|| self.clock.now_ms());

        let (spark_pack, spark_index) =
            match self.catalog.spark_for(&pack_id, &temporal::day_key(ts)) {
                Some(spark) => (spark.pack_id, spark.index),
                None => (pack_id, 0),
            };

        let artifact = self
            .lifecycle
            .save_at(blob, &spark_pack, spark_index, ts)
            .await?;
        if let Err(e) = self.trace.record_boop().await {
            warn!(id = %artifact.id, error = %e, "capture stored but boop not counted");
        }
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use tempfile::TempDir;

    const NOW: i64 = 1_792_411_200_000;

    async fn test_state() -> (AppState, Arc<ManualClock>, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = ClientConfig {
            db_path: Some(dir.path().join("boops.db")),
            ..ClientConfig::default()
        };
        let clock = Arc::new(ManualClock::new(NOW));
        let state = AppState::init_with_clock(config, clock.clone()).await.unwrap();
        (state, clock, dir)
    }

    #[tokio::test]
    async fn test_capture_picks_daily_spark_and_counts() {
        let (mut state, _clock, _dir) = test_state().await;

        let a = state.capture(b"jpeg".to_vec(), None, None).await.unwrap();
        let expected = state
            .catalog
            .spark_for("zen-but-dumb", &temporal::day_key(NOW))
            .unwrap();
        assert_eq!(a.spark_pack_id, "zen-but-dumb");
        assert_eq!(a.spark_index, expected.index);
        assert_eq!(state.trace.current().await.total_boops, 1);
        assert_eq!(state.trace.current().await.last_boop_ts, NOW);
    }

    #[tokio::test]
    async fn test_capture_succeeds_when_trace_write_fails() {
        let (mut state, _clock, dir) = test_state().await;
        let conn = rusqlite::Connection::open(dir.path().join("boops.db")).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER no_record_insert BEFORE INSERT ON records
             BEGIN SELECT RAISE(ABORT, 'read only'); END;
             CREATE TRIGGER no_record_update BEFORE UPDATE ON records
             BEGIN SELECT RAISE(ABORT, 'read only'); END;",
        )
        .unwrap();

        let a = state.capture(b"jpeg".to_vec(), None, None).await.unwrap();
        assert_eq!(state.store.get_by_id(&a.id).await.unwrap(), Some(a.clone()));
        assert_eq!(state.lifecycle.artifacts(), &[a]);
        assert_eq!(state.trace.current().await.total_boops, 0);
    }

    #[tokio::test]
    async fn test_capture_with_unknown_pack_falls_back() {
        let (mut state, _clock, _dir) = test_state().await;
        let a = state
            .capture(Vec::new(), Some("retired-pack"), None)
            .await
            .unwrap();
        assert_eq!(a.spark_pack_id, "zen-but-dumb");
    }

    #[tokio::test]
    async fn test_capture_uses_active_pack() {
        let (mut state, _clock, _dir) = test_state().await;
        state
            .settings
            .set_active_vibe_pack("soft-launch")
            .await
            .unwrap();

        let a = state.capture(Vec::new(), None, Some(NOW - 1)).await.unwrap();
        assert_eq!(a.spark_pack_id, "soft-launch");
        assert_eq!(a.ts, NOW - 1);
        assert!(state.catalog.line(&a.spark_pack_id, a.spark_index).is_some());
    }
}
