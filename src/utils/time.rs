//! Time and timestamp utilities

use chrono::Utc;

/// Seconds in one day
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Get current Unix timestamp in seconds
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}
