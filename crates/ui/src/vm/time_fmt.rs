use chrono::{DateTime, Utc};

/// Short label for when an attempt was recorded, e.g. `Nov 14, 22:13`.
#[must_use]
pub fn format_attempt_time(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %H:%M").to_string()
}
