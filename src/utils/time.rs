// src/utils/time.rs

use chrono::{DateTime, Duration, NaiveTime, Utc};

/// Half-open [start, end) bounds of the UTC calendar day containing `at`.
///
/// Reading-history dedup compares timestamps against these bounds rather
/// than casting to a date in SQL, so the "one reading row per day" rule
/// is independent of the server's and the store's session timezone.
pub fn utc_day_bounds(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = at.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}
