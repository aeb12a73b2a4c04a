//! Database migration runner.
//!
//! Migrations are executed in order on every [`Database::open_at`] call. Each
//! migration is guarded by the `user_version` pragma so it runs exactly once.
//!
//! [`Database::open_at`]: crate::Database::open_at

pub mod v001_initial;

use boopblur_shared::constants::SCHEMA_VERSION;
use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Run all pending migrations against the open connection.
///
/// Returns `true` when the initial schema was created by this call.
pub fn run_migrations(conn: &Connection) -> Result<bool> {
    let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    tracing::info!(
        current_version = current,
        target_version = SCHEMA_VERSION,
        "checking database migrations"
    );

    if current > SCHEMA_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema v{current} is newer than supported v{SCHEMA_VERSION}"
        )));
    }

    let mut created = false;

    if current < 1 {
        tracing::info!("applying migration v001_initial");
        v001_initial::up(conn).map_err(|e| StoreError::Migration(e.to_string()))?;
        conn.pragma_update(None, "user_version", 1)?;
        created = true;
    }

    Ok(created)
}
