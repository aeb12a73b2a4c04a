//! Calendar keys derived from millisecond timestamps.
//!
//! Day and week keys use the local calendar by default; the `_in` variants
//! take an explicit zone. Timestamps outside chrono's representable range are
//! clamped to its bounds.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};

use crate::constants::MS_PER_DAY;

fn to_date<Tz: TimeZone>(ts_ms: i64, tz: &Tz) -> NaiveDate {
    let utc = DateTime::<Utc>::from_timestamp_millis(ts_ms).unwrap_or(if ts_ms < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    });
    utc.with_timezone(tz).date_naive()
}

/// Calendar day `YYYY-MM-DD` in the local zone.
pub fn day_key(ts_ms: i64) -> String {
    day_key_in(ts_ms, &Local)
}

pub fn day_key_in<Tz: TimeZone>(ts_ms: i64, tz: &Tz) -> String {
    to_date(ts_ms, tz).format("%Y-%m-%d").to_string()
}

/// ISO-8601 week key `YYYY-Wnn` in the local zone.
///
/// The year is the ISO week-numbering year, so late December can map to
/// week 1 of the next year and early January to week 52/53 of the previous.
pub fn week_key(ts_ms: i64) -> String {
    week_key_in(ts_ms, &Local)
}

pub fn week_key_in<Tz: TimeZone>(ts_ms: i64, tz: &Tz) -> String {
    let week = to_date(ts_ms, tz).iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Monday that opens the ISO week containing `ts_ms`.
pub fn week_start(ts_ms: i64) -> NaiveDate {
    week_start_in(ts_ms, &Local)
}

pub fn week_start_in<Tz: TimeZone>(ts_ms: i64, tz: &Tz) -> NaiveDate {
    let date = to_date(ts_ms, tz);
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Whole days elapsed from `past_ms` to `now_ms`, floored.
///
/// Future timestamps give negative ages.
pub fn age_days(past_ms: i64, now_ms: i64) -> i64 {
    now_ms.saturating_sub(past_ms).div_euclid(MS_PER_DAY)
}

/// Stable non-negative hash of a string, used to pick a per-day index.
///
/// Folds UTF-16 code units with `h = h * 31 + c` in wrapping 32-bit
/// arithmetic and returns the magnitude.
pub fn content_hash(s: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in s.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit));
    }
    hash.unsigned_abs()
}
