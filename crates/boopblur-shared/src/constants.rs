/// File name of the local SQLite database
pub const DB_FILE_NAME: &str = "boopblur.db";

/// Schema version stored in `PRAGMA user_version`.
/// Bumped only on structural change.
pub const SCHEMA_VERSION: u32 = 1;

/// Milliseconds in one day
pub const MS_PER_DAY: i64 = 86_400_000;

/// Vibe pack used when no settings have been persisted
pub const DEFAULT_VIBE_PACK: &str = "zen-but-dumb";

/// Policy `delete-14-days`: artifacts strictly older than this are swept
pub const DELETE_14_DAYS_MAX_AGE: i64 = 14;

/// Policy `keep-4-weeks`: artifacts strictly older than this are swept
pub const KEEP_4_WEEKS_MAX_AGE: i64 = 28;

/// Keys of the auxiliary records table
pub const SETTINGS_RECORD_KEY: &str = "settings";
pub const TRACE_RECORD_KEY: &str = "trace";

/// Default interval between background cleanup passes (seconds)
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 3600;
