use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Phase;

/// Every state change in the system produces an Event.
/// The presentation layer polls `StateSnapshot` and renders the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Five minutes of usage remain before the limit.
    LimitReminder {
        elapsed_secs: u64,
        limit_secs: u32,
        at: DateTime<Utc>,
    },
    /// The limit was reached and the session is now locked.
    LockoutStarted {
        elapsed_secs: u64,
        locked_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// User asked to leave the lockout early; confirmation pending.
    UnlockRequested {
        at: DateTime<Utc>,
    },
    /// Early unlock confirmed; the countdown is running.
    UnlockCountdownStarted {
        remaining_secs: u8,
        at: DateTime<Utc>,
    },
    UnlockCountdownTick {
        remaining_secs: u8,
        at: DateTime<Utc>,
    },
    /// User backed out of the early-unlock confirmation.
    UnlockCancelled {
        at: DateTime<Utc>,
    },
    /// Countdown finished: elapsed time reset, lockout record cleared.
    SessionReset {
        at: DateTime<Utc>,
    },
    LimitChanged {
        limit_secs: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        elapsed_secs: u64,
        limit_secs: u32,
        phase: Phase,
        countdown_remaining: Option<u8>,
        seconds_until_midnight: u64,
        at: DateTime<Utc>,
    },
}
