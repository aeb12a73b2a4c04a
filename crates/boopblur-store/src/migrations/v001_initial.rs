//! v001 -- Initial schema creation.
//!
//! Creates the `artifacts` table with its three lookup indices, and the
//! `records` table holding the settings and trace singletons.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Artifacts
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS artifacts (
    id            TEXT PRIMARY KEY NOT NULL,
    ts            INTEGER NOT NULL,            -- ms since epoch
    iso_date      TEXT NOT NULL,               -- YYYY-MM-DD
    week_key      TEXT NOT NULL,               -- YYYY-Wnn
    kind          TEXT NOT NULL,               -- 'photo'
    blob          BLOB NOT NULL,
    spark_pack_id TEXT NOT NULL,               -- not a foreign key
    spark_index   INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_artifacts_by_date ON artifacts(iso_date);
CREATE INDEX IF NOT EXISTS idx_artifacts_by_week ON artifacts(week_key);
CREATE INDEX IF NOT EXISTS idx_artifacts_by_ts   ON artifacts(ts);

-- ----------------------------------------------------------------
-- Keyed JSON records (settings, trace)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS records (
    key  TEXT PRIMARY KEY NOT NULL,
    json TEXT NOT NULL
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
