/*!
 * Timestamps
 * Node times are whole seconds since the UNIX epoch, matching the store format
 */

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the UNIX epoch
pub type Timestamp = i64;

/// Current time as a timestamp
///
/// Clocks set before 1970 yield a negative value instead of failing.
#[inline]
pub fn now() -> Timestamp {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as Timestamp,
        Err(e) => -(e.duration().as_secs() as Timestamp),
    }
}

/// Convert a timestamp back to a `SystemTime`
pub fn to_system_time(ts: Timestamp) -> SystemTime {
    if ts >= 0 {
        UNIX_EPOCH + std::time::Duration::from_secs(ts as u64)
    } else {
        UNIX_EPOCH - std::time::Duration::from_secs(ts.unsigned_abs())
    }
}
