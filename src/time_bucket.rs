use chrono::{DateTime, Duration, NaiveDateTime};

/// Rounds `timestamp` down to the start of its fixed-width bucket.
///
/// Buckets are aligned on the Unix epoch, so any width dividing 24 h
/// (5, 10, 15, 30, 60 min, ...) also starts a bucket at midnight.
pub fn floor_to_bucket(timestamp: NaiveDateTime, width: Duration) -> NaiveDateTime {
    let width_secs = width.num_seconds();
    if width_secs <= 0 {
        return timestamp;
    }

    let secs = timestamp.and_utc().timestamp();
    let floored = secs - secs.rem_euclid(width_secs);

    DateTime::from_timestamp(floored, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or(timestamp)
}
