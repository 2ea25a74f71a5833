pub mod day;
mod engine;
mod threshold;

pub use engine::{Phase, SessionEngine};
pub use threshold::{
    classify, Threshold, REMINDER_DELAY_SECS, REMINDER_LEAD_SECS, UNLOCK_COUNTDOWN_SECS,
};
