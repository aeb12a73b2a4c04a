//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! migrations are run before any other operation.

use std::path::{Path, PathBuf};

use boopblur_shared::constants::DB_FILE_NAME;
use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::migrations;

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
    created_schema: bool,
}

impl Database {
    /// Path of the default application database, creating its directory.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/boopblur/boopblur.db`
    /// - macOS:   `~/Library/Application Support/com.boopblur.boopblur/boopblur.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\boopblur\boopblur\data\boopblur.db`
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs =
            ProjectDirs::from("com", "boopblur", "boopblur").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DB_FILE_NAME))
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// The parent directory must already exist.
    pub fn open_at(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "opening database");

        let conn = Connection::open(path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;

        let created_schema = migrations::run_migrations(&conn)?;

        Ok(Self {
            conn,
            created_schema,
        })
    }

    /// Whether opening this handle created the schema from scratch.
    pub fn created_schema(&self) -> bool {
        self.created_schema
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return a mutable reference to the underlying connection, needed to
    /// open transactions.
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        let db = Database::open_at(&path).expect("should open");
        assert!(db.path().is_some());
        assert!(db.created_schema());
    }

    #[test]
    fn reopen_does_not_recreate_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        drop(Database::open_at(&path).unwrap());
        let db = Database::open_at(&path).unwrap();
        assert!(!db.created_schema());
    }

    #[test]
    fn open_fails_without_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("test.db");
        assert!(Database::open_at(&path).is_err());
    }
}
