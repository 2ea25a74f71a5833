//! Injectable time source and the named periodic cadences.
//!
//! The engine never reads the wall clock directly and never sleeps.
//! The host drives it from timers built over [`Cadence`]; tests drive
//! it with a [`ManualClock`] and direct tick calls, so no test ever
//! depends on real time passing.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Supplies the current time to the engine.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used by the real application.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Advance-able fake clock for tests.
///
/// Clones share the same underlying instant, so a test can hold one
/// handle while the engine owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.now.set(instant);
    }

    pub fn advance(&self, delta: chrono::Duration) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// The periodic signals that drive the engine.
///
/// Both run at a one second period, but they are independent sources:
/// nothing may depend on their relative firing order within the same
/// wall-clock second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cadence {
    /// Advances elapsed usage time while unlocked.
    Usage,
    /// Advances the early-unlock countdown.
    Countdown,
}

impl Cadence {
    pub fn period(self) -> Duration {
        match self {
            Cadence::Usage | Cadence::Countdown => Duration::from_secs(1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Cadence::Usage => "usage",
            Cadence::Countdown => "countdown",
        }
    }
}
