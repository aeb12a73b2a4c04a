//! Capture counter service.

use std::sync::Arc;

use boopblur_shared::constants::TRACE_RECORD_KEY;
use boopblur_shared::Trace;
use boopblur_store::ArtifactStore;
use tokio::sync::RwLock;
use tracing::debug;

use crate::clock::Clock;
use crate::error::Result;
use crate::records;

pub struct TraceService {
    store: Arc<ArtifactStore>,
    clock: Arc<dyn Clock>,
    current: RwLock<Trace>,
}

impl TraceService {
    pub fn new(store: Arc<ArtifactStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            current: RwLock::new(Trace::default()),
        }
    }

    /// Replace the in-memory trace with the persisted one (zeroed when
    /// absent or unreadable).
    pub async fn load(&self) -> Result<Trace> {
        let loaded = records::load_or(&self.store, TRACE_RECORD_KEY, Trace::default()).await?;
        *self.current.write().await = loaded;
        Ok(loaded)
    }

    pub async fn current(&self) -> Trace {
        *self.current.read().await
    }

    /// Count one capture at the clock's current time.
    pub async fn record_boop(&self) -> Result<Trace> {
        let mut guard = self.current.write().await;
        let mut next = *guard;
        next.record(self.clock.now_ms());
        records::save(&self.store, TRACE_RECORD_KEY, &next).await?;
        *guard = next;
        debug!(total = next.total_boops, "boop recorded");
        Ok(next)
    }

    pub async fn reset(&self) -> Result<Trace> {
        let mut guard = self.current.write().await;
        let next = Trace::default();
        records::save(&self.store, TRACE_RECORD_KEY, &next).await?;
        *guard = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use tempfile::TempDir;

    const NOW: i64 = 1_792_411_200_000;

    fn service() -> (TraceService, Arc<ArtifactStore>, Arc<ManualClock>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(ArtifactStore::new(dir.path().join("boops.db")));
        let clock = Arc::new(ManualClock::new(NOW));
        let service = TraceService::new(store.clone(), clock.clone());
        (service, store, clock, dir)
    }

    #[tokio::test]
    async fn test_record_boop_counts_and_stamps() {
        let (service, store, clock, _dir) = service();
        service.load().await.unwrap();

        service.record_boop().await.unwrap();
        clock.advance_days(1);
        let trace = service.record_boop().await.unwrap();

        assert_eq!(trace.total_boops, 2);
        assert_eq!(trace.last_boop_ts, clock.now_ms());

        let reloaded = TraceService::new(store, clock);
        assert_eq!(reloaded.load().await.unwrap(), trace);
    }

    #[tokio::test]
    async fn test_corrupt_record_gives_zeroed_trace() {
        let (service, store, _clock, _dir) = service();
        store
            .save_record(TRACE_RECORD_KEY, r#"{"totalBoops":"many"}"#)
            .await
            .unwrap();
        assert_eq!(service.load().await.unwrap(), Trace::default());
    }

    #[tokio::test]
    async fn test_reset() {
        let (service, store, clock, _dir) = service();
        service.record_boop().await.unwrap();
        assert_eq!(service.reset().await.unwrap(), Trace::default());

        let reloaded = TraceService::new(store, clock);
        assert_eq!(reloaded.load().await.unwrap(), Trace::default());
    }
}
