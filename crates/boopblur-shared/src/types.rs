use std::fmt;
use std::str::FromStr;

use chrono::TimeZone;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_VIBE_PACK;
use crate::error::ParsePolicyError;
use crate::temporal;

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// Kind of captured artifact. Only photos exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Photo,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "photo" => Some(Self::Photo),
            _ => None,
        }
    }
}

/// One captured moment ("boop").
///
/// `iso_date` and `week_key` are derived from `ts` when the artifact is
/// created and are never mutated independently. Artifacts are never updated
/// in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Opaque unique identifier, primary key.
    pub id: String,
    /// Capture instant, milliseconds since the Unix epoch.
    pub ts: i64,
    /// Calendar day `YYYY-MM-DD`.
    pub iso_date: String,
    /// ISO week key `YYYY-Wnn`.
    pub week_key: String,
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    /// Image payload.
    pub blob: Vec<u8>,
    /// Weak reference into the vibe-pack catalog. Not enforced.
    pub spark_pack_id: String,
    pub spark_index: u32,
}

impl Artifact {
    /// Build a photo artifact, deriving its calendar keys in the local zone.
    pub fn photo(
        id: impl Into<String>,
        ts: i64,
        blob: Vec<u8>,
        spark_pack_id: impl Into<String>,
        spark_index: u32,
    ) -> Self {
        Self::photo_in(id, ts, &chrono::Local, blob, spark_pack_id, spark_index)
    }

    /// Same as [`Artifact::photo`] with an explicit time zone.
    pub fn photo_in<Tz: TimeZone>(
        id: impl Into<String>,
        ts: i64,
        tz: &Tz,
        blob: Vec<u8>,
        spark_pack_id: impl Into<String>,
        spark_index: u32,
    ) -> Self {
        Self {
            id: id.into(),
            ts,
            iso_date: temporal::day_key_in(ts, tz),
            week_key: temporal::week_key_in(ts, tz),
            kind: ArtifactKind::Photo,
            blob,
            spark_pack_id: spark_pack_id.into(),
            spark_index,
        }
    }
}

// ---------------------------------------------------------------------------
// Deletion policy
// ---------------------------------------------------------------------------

/// Retention policy chosen by the user.
///
/// Values that do not match a known policy are kept verbatim in
/// `Unrecognized` so they survive a load/save cycle; the retention engine
/// treats them as [`DeletionPolicy::Off`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeletionPolicy {
    #[default]
    Off,
    Keep4Weeks,
    Delete14Days,
    Unrecognized(String),
}

impl DeletionPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Off => "off",
            Self::Keep4Weeks => "keep-4-weeks",
            Self::Delete14Days => "delete-14-days",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl FromStr for DeletionPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "keep-4-weeks" => Ok(Self::Keep4Weeks),
            "delete-14-days" => Ok(Self::Delete14Days),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

impl From<String> for DeletionPolicy {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(Self::Unrecognized(s))
    }
}

impl From<DeletionPolicy> for String {
    fn from(p: DeletionPolicy) -> Self {
        match p {
            DeletionPolicy::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DeletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Settings / Trace
// ---------------------------------------------------------------------------

/// User settings, persisted as a single JSON record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub active_vibe_pack: String,
    pub deletion_policy: DeletionPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            active_vibe_pack: DEFAULT_VIBE_PACK.into(),
            deletion_policy: DeletionPolicy::Off,
        }
    }
}

/// Running capture counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trace {
    pub total_boops: u64,
    pub last_boop_ts: i64,
}

impl Trace {
    /// Count one more capture at `now_ms`.
    pub fn record(&mut self, now_ms: i64) {
        self.total_boops = self.total_boops.saturating_add(1);
        self.last_boop_ts = now_ms;
    }
}
