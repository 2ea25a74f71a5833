//! Calendar-day helpers.
//!
//! The lockout record is scoped to the local calendar day it was
//! written on; `same_local_day` is the comparison restore uses to
//! decide whether a stored record is still active. The midnight
//! countdown values are display-only and never gate a transition.

use chrono::{DateTime, Local, Utc};

/// Whether two instants fall on the same local calendar day.
pub fn same_local_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.with_timezone(&Local).date_naive() == b.with_timezone(&Local).date_naive()
}

/// Seconds from `now` until the next local midnight.
pub fn seconds_until_midnight(now: DateTime<Local>) -> u64 {
    let Some(tomorrow) = now.date_naive().succ_opt() else {
        return 0;
    };
    let Some(midnight) = tomorrow.and_hms_opt(0, 0, 0) else {
        return 0;
    };
    (midnight - now.naive_local()).num_seconds().max(0) as u64
}

/// Render a second count as `HH:MM:SS`.
pub fn format_hms(total_secs: u64) -> String {
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}
