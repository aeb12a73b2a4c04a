//! Async, lazily-connected artifact store.
//!
//! [`ArtifactStore`] owns the process-wide [`Database`] handle. The handle is
//! opened on first use: every operation goes through [`ArtifactStore::ensure_ready`].
//! Opening is serialized behind a gate, so the schema is created at most
//! once, and callers that queued behind an attempt share its outcome. A
//! failed open leaves the store uninitialised and the next call tries again.
//!
//! rusqlite calls, the open included, run on the blocking thread pool.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use boopblur_shared::Artifact;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::database::Database;
use crate::error::{Result, StoreError};

pub struct ArtifactStore {
    path: PathBuf,
    db: OnceCell<Arc<Mutex<Database>>>,
    /// Held while an open is in flight; keeps the error of the last failed one.
    open_gate: Mutex<Option<Arc<StoreError>>>,
    failed_opens: AtomicUsize,
    open_attempts: AtomicUsize,
    schema_creations: AtomicUsize,
}

impl ArtifactStore {
    /// Store backed by the SQLite file at `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            db: OnceCell::new(),
            open_gate: Mutex::new(None),
            failed_opens: AtomicUsize::new(0),
            open_attempts: AtomicUsize::new(0),
            schema_creations: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_ready(&self) -> bool {
        self.db.initialized()
    }

    /// Number of times an open was started (successful or not).
    pub fn open_attempts(&self) -> usize {
        self.open_attempts.load(Ordering::SeqCst)
    }

    /// Number of times this store created the schema from scratch.
    pub fn schema_creations(&self) -> usize {
        self.schema_creations.load(Ordering::SeqCst)
    }

    /// Open the database if it is not open yet. Idempotent.
    pub async fn ensure_ready(&self) -> Result<()> {
        self.handle().await.map(|_| ())
    }

    async fn handle(&self) -> Result<Arc<Mutex<Database>>> {
        if let Some(db) = self.db.get() {
            return Ok(db.clone());
        }

        let seen_failures = self.failed_opens.load(Ordering::SeqCst);
        let mut last_failure = self.open_gate.lock().await;

        if let Some(db) = self.db.get() {
            return Ok(db.clone());
        }
        // An attempt finished while this caller was queued: share its result.
        if self.failed_opens.load(Ordering::SeqCst) != seen_failures {
            if let Some(err) = last_failure.as_ref() {
                return Err(StoreError::Open(err.clone()));
            }
        }

        self.open_attempts.fetch_add(1, Ordering::SeqCst);
        let path = self.path.clone();
        let opened = match tokio::task::spawn_blocking(move || Database::open_at(&path)).await {
            Ok(result) => result,
            Err(e) => Err(StoreError::Join(e)),
        };

        match opened {
            Ok(db) => {
                if db.created_schema() {
                    self.schema_creations.fetch_add(1, Ordering::SeqCst);
                }
                let db = Arc::new(Mutex::new(db));
                if self.db.set(db.clone()).is_err() {
                    warn!("artifact store opened twice");
                }
                *last_failure = None;
                info!(path = %self.path.display(), "artifact store ready");
                Ok(db)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "artifact store open failed");
                let err = Arc::new(e);
                *last_failure = Some(err.clone());
                self.failed_opens.fetch_add(1, Ordering::SeqCst);
                Err(StoreError::Open(err))
            }
        }
    }

    /// Run `op` against the open database on the blocking thread pool.
    async fn with_db<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.handle().await?;
        tokio::task::spawn_blocking(move || {
            let mut guard = db.blocking_lock();
            op(&mut *guard)
        })
        .await?
    }

    // ------------------------------------------------------------------
    // Artifacts
    // ------------------------------------------------------------------

    /// Insert or overwrite by id.
    pub async fn put(&self, artifact: &Artifact) -> Result<()> {
        let row = artifact.clone();
        self.with_db(move |db| db.put_artifact(&row)).await?;
        debug!(id = %artifact.id, week = %artifact.week_key, "artifact stored");
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Artifact>> {
        let id = id.to_owned();
        self.with_db(move |db| db.get_artifact(&id)).await
    }

    /// Every stored artifact, order unspecified.
    pub async fn get_all(&self) -> Result<Vec<Artifact>> {
        self.with_db(|db| db.list_artifacts()).await
    }

    pub async fn get_all_by_week(&self, week_key: &str) -> Result<Vec<Artifact>> {
        let week_key = week_key.to_owned();
        self.with_db(move |db| db.list_artifacts_by_week(&week_key))
            .await
    }

    pub async fn get_all_by_date(&self, iso_date: &str) -> Result<Vec<Artifact>> {
        let iso_date = iso_date.to_owned();
        self.with_db(move |db| db.list_artifacts_by_date(&iso_date))
            .await
    }

    /// Remove `id` if present; absence is not an error.
    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        let owned = id.to_owned();
        let removed = self.with_db(move |db| db.delete_artifact(&owned)).await?;
        debug!(id, removed, "artifact delete");
        Ok(())
    }

    /// Remove all `ids` in one transaction. Returns how many rows existed.
    pub async fn delete_batch(&self, ids: &[String]) -> Result<usize> {
        let owned = ids.to_vec();
        let removed = self.with_db(move |db| db.delete_artifacts(&owned)).await?;
        debug!(requested = ids.len(), removed, "artifact batch delete");
        Ok(removed)
    }

    pub async fn clear_all(&self) -> Result<usize> {
        let removed = self.with_db(|db| db.clear_artifacts()).await?;
        info!(removed, "all artifacts cleared");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Auxiliary records
    // ------------------------------------------------------------------

    pub async fn load_record(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_owned();
        self.with_db(move |db| db.get_record(&key)).await
    }

    pub async fn save_record(&self, key: &str, json: &str) -> Result<()> {
        let key = key.to_owned();
        let json = json.to_owned();
        self.with_db(move |db| db.put_record(&key, &json)).await
    }
}

impl std::fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("path", &self.path)
            .field("ready", &self.is_ready())
            .finish()
    }
}
