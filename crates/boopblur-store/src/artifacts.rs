//! CRUD operations for [`Artifact`] records.

use boopblur_shared::{Artifact, ArtifactKind};
use rusqlite::{params, OptionalExtension, Params};

use crate::database::Database;
use crate::error::Result;

const SELECT_COLUMNS: &str =
    "SELECT id, ts, iso_date, week_key, kind, blob, spark_pack_id, spark_index FROM artifacts";

impl Database {
    // ------------------------------------------------------------------
    // Write
    // ------------------------------------------------------------------

    /// Insert an artifact, replacing any existing row with the same id.
    pub fn put_artifact(&self, artifact: &Artifact) -> Result<()> {
        self.conn().execute(
            "INSERT INTO artifacts (id, ts, iso_date, week_key, kind, blob, spark_pack_id, spark_index)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                ts = excluded.ts,
                iso_date = excluded.iso_date,
                week_key = excluded.week_key,
                kind = excluded.kind,
                blob = excluded.blob,
                spark_pack_id = excluded.spark_pack_id,
                spark_index = excluded.spark_index",
            params![
                artifact.id,
                artifact.ts,
                artifact.iso_date,
                artifact.week_key,
                artifact.kind.as_str(),
                artifact.blob,
                artifact.spark_pack_id,
                artifact.spark_index,
            ],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_artifact(&self, id: &str) -> Result<Option<Artifact>> {
        let artifact = self
            .conn()
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_artifact,
            )
            .optional()?;
        Ok(artifact)
    }

    pub fn list_artifacts(&self) -> Result<Vec<Artifact>> {
        self.query_artifacts(SELECT_COLUMNS, params![])
    }

    /// Artifacts whose ISO week key equals `week_key` (index lookup).
    pub fn list_artifacts_by_week(&self, week_key: &str) -> Result<Vec<Artifact>> {
        self.query_artifacts(&format!("{SELECT_COLUMNS} WHERE week_key = ?1"), params![week_key])
    }

    /// Artifacts captured on the calendar day `iso_date` (index lookup).
    pub fn list_artifacts_by_date(&self, iso_date: &str) -> Result<Vec<Artifact>> {
        self.query_artifacts(&format!("{SELECT_COLUMNS} WHERE iso_date = ?1"), params![iso_date])
    }

    fn query_artifacts<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Artifact>> {
        let mut stmt = self.conn().prepare(sql)?;
        let rows = stmt.query_map(params, row_to_artifact)?;

        let mut artifacts = Vec::new();
        for row in rows {
            artifacts.push(row?);
        }
        Ok(artifacts)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete an artifact by id. Returns `true` if a row was deleted.
    pub fn delete_artifact(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM artifacts WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Delete every listed id inside one transaction.
    ///
    /// Ids that are not present are skipped. If any statement fails the
    /// whole batch is rolled back. Returns the number of rows removed.
    pub fn delete_artifacts(&mut self, ids: &[String]) -> Result<usize> {
        let tx = self.conn_mut().transaction()?;
        let mut removed = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM artifacts WHERE id = ?1")?;
            for id in ids {
                removed += stmt.execute(params![id])?;
            }
        }
        tx.commit()?;
        Ok(removed)
    }

    /// Remove every artifact. Returns the number of rows removed.
    pub fn clear_artifacts(&self) -> Result<usize> {
        let affected = self.conn().execute("DELETE FROM artifacts", [])?;
        Ok(affected)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to an [`Artifact`].
fn row_to_artifact(row: &rusqlite::Row<'_>) -> rusqlite::Result<Artifact> {
    let kind_str: String = row.get(4)?;
    let kind = ArtifactKind::from_str_opt(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown artifact kind: {kind_str}").into(),
        )
    })?;

    Ok(Artifact {
        id: row.get(0)?,
        ts: row.get(1)?,
        iso_date: row.get(2)?,
        week_key: row.get(3)?,
        kind,
        blob: row.get(5)?,
        spark_pack_id: row.get(6)?,
        spark_index: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use boopblur_shared::constants::MS_PER_DAY;
    use chrono::Utc;

    const NOW: i64 = 1_792_411_200_000; // 2026-10-19 12:00 UTC

    fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (db, dir)
    }

    fn photo(id: &str, ts: i64) -> Artifact {
        Artifact::photo_in(id, ts, &Utc, vec![0xFF, 0xD8, id.len() as u8], "zen-but-dumb", 2)
    }

    #[test]
    fn test_put_and_get() {
        let (db, _dir) = test_db();
        let a = photo("a", NOW);
        db.put_artifact(&a).unwrap();

        assert_eq!(db.get_artifact("a").unwrap(), Some(a));
        assert_eq!(db.get_artifact("missing").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let (db, _dir) = test_db();
        let mut a = photo("a", NOW);
        db.put_artifact(&a).unwrap();

        a.blob = vec![1, 2, 3, 4];
        a.spark_index = 6;
        db.put_artifact(&a).unwrap();

        assert_eq!(db.list_artifacts().unwrap(), vec![a]);
    }

    #[test]
    fn test_index_lookups() {
        let (db, _dir) = test_db();
        db.put_artifact(&photo("today-1", NOW)).unwrap();
        db.put_artifact(&photo("today-2", NOW)).unwrap();
        db.put_artifact(&photo("yesterday", NOW - MS_PER_DAY)).unwrap();
        db.put_artifact(&photo("last-week", NOW - 7 * MS_PER_DAY)).unwrap();

        let mut today: Vec<String> = db
            .list_artifacts_by_date("2026-10-19")
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        today.sort();
        assert_eq!(today, vec!["today-1", "today-2"]);

        // 2026-10-18 is a Sunday, the tail of W42
        let week = db.list_artifacts_by_week("2026-W43").unwrap();
        assert_eq!(week.len(), 2);
        assert_eq!(db.list_artifacts_by_week("2026-W42").unwrap().len(), 2);
        assert!(db.list_artifacts_by_date("1999-01-01").unwrap().is_empty());
    }

    #[test]
    fn test_delete_single() {
        let (db, _dir) = test_db();
        db.put_artifact(&photo("a", NOW)).unwrap();

        assert!(db.delete_artifact("a").unwrap());
        assert!(!db.delete_artifact("a").unwrap());
        assert!(db.list_artifacts().unwrap().is_empty());
    }

    #[test]
    fn test_delete_batch_skips_absent_ids() {
        let (mut db, _dir) = test_db();
        db.put_artifact(&photo("a", NOW)).unwrap();
        db.put_artifact(&photo("keep", NOW)).unwrap();

        let removed = db
            .delete_artifacts(&["a".to_string(), "ghost".to_string()])
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(db.get_artifact("a").unwrap(), None);
        assert!(db.get_artifact("keep").unwrap().is_some());
    }

    #[test]
    fn test_delete_batch_is_atomic() {
        let (mut db, _dir) = test_db();
        db.put_artifact(&photo("a", NOW)).unwrap();
        db.put_artifact(&photo("locked", NOW)).unwrap();
        db.conn()
            .execute_batch(
                "CREATE TRIGGER refuse_locked BEFORE DELETE ON artifacts
                 WHEN OLD.id = 'locked'
                 BEGIN SELECT RAISE(ABORT, 'locked'); END;",
            )
            .unwrap();

        let result = db.delete_artifacts(&["a".to_string(), "locked".to_string()]);
        assert!(result.is_err());
        // "a" was deleted first but the failure rolled it back
        assert!(db.get_artifact("a").unwrap().is_some());
        assert!(db.get_artifact("locked").unwrap().is_some());
    }

    #[test]
    fn test_clear() {
        let (db, _dir) = test_db();
        db.put_artifact(&photo("a", NOW)).unwrap();
        db.put_artifact(&photo("b", NOW)).unwrap();

        assert_eq!(db.clear_artifacts().unwrap(), 2);
        assert!(db.list_artifacts().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_kind_is_a_conversion_error() {
        let (db, _dir) = test_db();
        db.put_artifact(&photo("a", NOW)).unwrap();
        db.conn()
            .execute("UPDATE artifacts SET kind = 'video' WHERE id = 'a'", [])
            .unwrap();

        let err = db.get_artifact("a").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Sqlite(rusqlite::Error::FromSqlConversionFailure(4, _, _))
        ));
        assert!(db.list_artifacts().is_err());
    }
}
