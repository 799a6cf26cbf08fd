//! Wall-clock helpers
//!
//! Lock markers encode absolute deadlines in epoch seconds, so every
//! participant reads the same clock through these helpers.

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch, with sub-second precision.
pub fn epoch_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
