use chrono::{DateTime, SubsecRound, TimeDelta, Utc};

/// Instant stored in every audit timestamp column.
pub type Timestamp = DateTime<Utc>;

/// Current instant in UTC, truncated to microseconds.
///
/// `timestamptz` keeps microseconds, so truncating here means a value read back
/// from the database compares equal to the value that was written.
#[must_use]
pub fn utc_now() -> Timestamp {
    Utc::now().trunc_subsecs(6)
}

/// `created_at` for a record about to be inserted.
///
/// An explicitly supplied value (e.g. a backfill restoring history) wins.
#[must_use]
pub fn insertion_timestamp(existing: Option<Timestamp>, now: Timestamp) -> Timestamp {
    existing.unwrap_or(now)
}

/// `updated_at` for a record about to be updated.
///
/// Always later than both the previous `updated_at` and `created_at`, even when
/// the clock has not advanced since the last write or has stepped backwards.
#[must_use]
pub fn update_timestamp(
    created_at: Option<Timestamp>,
    previous: Option<Timestamp>,
    now: Timestamp,
) -> Timestamp {
    match created_at.max(previous) {
        Some(floor) if now <= floor => floor + TimeDelta::microseconds(1),
        _ => now,
    }
}
