use chrono::{DateTime, Duration, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Unix timestamp `hours` from now, as used for token expiry.
pub fn expiry_after_hours(hours: i64) -> usize {
    (now() + Duration::hours(hours)).timestamp().max(0) as usize
}
