//! Keyed JSON records for the settings and trace singletons.

use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;

impl Database {
    /// Raw JSON stored under `key`, if any.
    pub fn get_record(&self, key: &str) -> Result<Option<String>> {
        let json = self
            .conn()
            .query_row(
                "SELECT json FROM records WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(json)
    }

    pub fn put_record(&self, key: &str, json: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO records (key, json) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET json = excluded.json",
            params![key, json],
        )?;
        Ok(())
    }
}
