//! Threshold classification for the usage counter.
//!
//! Pure logic, evaluated once per one-second increment of elapsed
//! time. The near-limit reminder is edge-triggered: it is true for
//! exactly one elapsed value, and a skipped increment never fires it
//! retroactively.

use serde::{Deserialize, Serialize};

/// Seconds of headroom left when the reminder fires.
pub const REMINDER_LEAD_SECS: u64 = 300;

/// Delay passed along with the reminder intent.
pub const REMINDER_DELAY_SECS: u64 = 5;

/// Length of the early-unlock countdown.
pub const UNLOCK_COUNTDOWN_SECS: u8 = 10;

/// Result of classifying one elapsed value against the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    /// Exactly five minutes of usage remain. Edge-triggered; never
    /// true when the limit itself is under five minutes.
    pub near_limit: bool,
    /// The limit is reached or passed.
    pub exceeded: bool,
}

/// Classify an elapsed value against the limit.
///
/// `exceeded` is level-triggered, but because accumulation freezes as
/// soon as the session locks, it is observed at most once per lockout
/// episode as long as the caller classifies after every single-second
/// increment.
pub fn classify(elapsed_secs: u64, limit_secs: u32) -> Threshold {
    let limit = u64::from(limit_secs);
    Threshold {
        near_limit: limit >= REMINDER_LEAD_SECS && elapsed_secs == limit - REMINDER_LEAD_SECS,
        exceeded: elapsed_secs >= limit,
    }
}
