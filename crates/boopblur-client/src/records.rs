//! Single-row JSON records kept next to the artifacts.
//!
//! A missing or unreadable record yields the caller's fallback, and fields
//! missing from a stored record are taken from it. Only a failing store is
//! reported as an error.

use boopblur_store::ArtifactStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::Result;

pub async fn load_or<T>(store: &ArtifactStore, key: &str, fallback: T) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let Some(json) = store.load_record(key).await? else {
        return Ok(fallback);
    };

    match overlay(&fallback, &json) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(key, error = %e, "corrupt record, using defaults");
            Ok(fallback)
        }
    }
}

/// Fields of the stored `json` object over the serialized `base`.
fn overlay<T>(base: &T, json: &str) -> serde_json::Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let stored: Value = serde_json::from_str(json)?;
    let merged = match (serde_json::to_value(base)?, stored) {
        (Value::Object(mut fields), Value::Object(overrides)) => {
            fields.extend(overrides);
            Value::Object(fields)
        }
        (_, other) => other,
    };
    serde_json::from_value(merged)
}

pub async fn save<T>(store: &ArtifactStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize,
{
    let json = serde_json::to_string(value)?;
    store.save_record(key, &json).await?;
    Ok(())
}
