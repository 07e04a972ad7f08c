use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Compact `YYYYMMDD` stamp used in generated report filenames.
pub fn day_stamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%d").to_string()
}
