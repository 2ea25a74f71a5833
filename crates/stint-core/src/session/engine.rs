//! Session engine implementation.
//!
//! The engine is a caller-driven state machine. It does not use
//! internal threads or timers - the host invokes `tick_usage()` and
//! `tick_countdown()` on the two one-second cadences.
//!
//! ## State Transitions
//!
//! ```text
//! Unlocked -> Locked -> UnlockPending(10..=1) -> Unlocked
//! ```
//!
//! Entry into `UnlockPending` is gated by an explicit confirmation
//! step: `request_early_unlock()` followed by `confirm_early_unlock()`.
//! Once the countdown starts it always runs to completion.
//!
//! ## Durability
//!
//! The only persisted state is the day-scoped [`LockoutRecord`]. The
//! record is written when the session locks and removed when the
//! countdown completes; a transition is only committed after its
//! store call succeeds. At restore, a record written on a previous
//! calendar day is discarded, never read as state.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{CoreError, ValidationError};
use crate::events::Event;
use crate::notify::Notifier;
use crate::session::day;
use crate::session::threshold::{self, REMINDER_DELAY_SECS, UNLOCK_COUNTDOWN_SECS};
use crate::storage::{LockoutRecord, LockoutStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Unlocked,
    Locked,
    /// Early unlock confirmed; `remaining` seconds left on the countdown.
    UnlockPending { remaining: u8 },
}

/// Core session engine.
///
/// Owns the in-memory session state exclusively; the store, clock and
/// notification sink are injected ports. The state dies with the
/// process - only the lockout record survives a restart.
pub struct SessionEngine {
    elapsed_secs: u64,
    limit_secs: u32,
    phase: Phase,
    /// Confirmation gate, meaningful only while `Locked`.
    unlock_requested: bool,
    store: Box<dyn LockoutStore>,
    clock: Box<dyn Clock>,
    notifier: Box<dyn Notifier>,
}

impl SessionEngine {
    /// Construct the engine from the persisted lockout record.
    ///
    /// Restores `Locked` with the recorded elapsed time if the record
    /// was written today (local calendar day); otherwise starts
    /// `Unlocked` at zero and clears any stale record. Emits the
    /// notification-permission intent once.
    ///
    /// # Errors
    ///
    /// Rejects a zero limit; propagates store failures. A missing or
    /// unreadable record is not an error - the engine fails open to
    /// `Unlocked`.
    pub fn restore(
        limit_secs: u32,
        store: Box<dyn LockoutStore>,
        clock: Box<dyn Clock>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self, CoreError> {
        if limit_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "limit_secs".into(),
                message: "must be positive".into(),
            }
            .into());
        }

        notifier.request_permission();

        let (phase, elapsed_secs) = match store.load()? {
            Some(record) if day::same_local_day(record.locked_at, clock.now()) => {
                (Phase::Locked, record.elapsed_secs)
            }
            Some(_) => {
                store.clear()?;
                (Phase::Unlocked, 0)
            }
            None => (Phase::Unlocked, 0),
        };

        Ok(Self {
            elapsed_secs,
            limit_secs,
            phase,
            unlock_requested: false,
            store,
            clock,
            notifier,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn limit_secs(&self) -> u32 {
        self.limit_secs
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn unlock_requested(&self) -> bool {
        self.unlock_requested
    }

    pub fn countdown_remaining(&self) -> Option<u8> {
        match self.phase {
            Phase::UnlockPending { remaining } => Some(remaining),
            _ => None,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let now = self.clock.now();
        Event::StateSnapshot {
            elapsed_secs: self.elapsed_secs,
            limit_secs: self.limit_secs,
            phase: self.phase,
            countdown_remaining: self.countdown_remaining(),
            seconds_until_midnight: day::seconds_until_midnight(now.with_timezone(&Local)),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Change the daily limit. Takes effect from the next usage tick.
    ///
    /// # Errors
    ///
    /// Rejects a zero limit.
    pub fn set_limit(&mut self, limit_secs: u32) -> Result<Event, CoreError> {
        if limit_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "limit_secs".into(),
                message: "must be positive".into(),
            }
            .into());
        }
        self.limit_secs = limit_secs;
        Ok(Event::LimitChanged {
            limit_secs,
            at: self.clock.now(),
        })
    }

    /// Ask to leave the lockout early. Only raises the confirmation
    /// gate; no countdown starts until the request is confirmed.
    pub fn request_early_unlock(&mut self) -> Option<Event> {
        if self.phase != Phase::Locked || self.unlock_requested {
            return None;
        }
        self.unlock_requested = true;
        Some(Event::UnlockRequested {
            at: self.clock.now(),
        })
    }

    /// Confirm a pending early-unlock request and start the countdown.
    pub fn confirm_early_unlock(&mut self) -> Option<Event> {
        if self.phase != Phase::Locked || !self.unlock_requested {
            return None;
        }
        self.unlock_requested = false;
        self.phase = Phase::UnlockPending {
            remaining: UNLOCK_COUNTDOWN_SECS,
        };
        Some(Event::UnlockCountdownStarted {
            remaining_secs: UNLOCK_COUNTDOWN_SECS,
            at: self.clock.now(),
        })
    }

    /// Back out of a pending early-unlock request.
    pub fn cancel_early_unlock(&mut self) -> Option<Event> {
        if self.phase != Phase::Locked || !self.unlock_requested {
            return None;
        }
        self.unlock_requested = false;
        Some(Event::UnlockCancelled {
            at: self.clock.now(),
        })
    }

    // ── Ticks ────────────────────────────────────────────────────────

    /// Advance elapsed usage by one second and classify the new value.
    /// Call at most once per `Cadence::Usage` tick; a no-op in any
    /// phase other than `Unlocked`.
    ///
    /// # Errors
    ///
    /// If persisting the lockout record fails, the whole tick is left
    /// unapplied: still `Unlocked`, elapsed unchanged.
    pub fn tick_usage(&mut self) -> Result<Option<Event>, CoreError> {
        if self.phase != Phase::Unlocked {
            return Ok(None);
        }
        let next = self.elapsed_secs + 1;
        let threshold = threshold::classify(next, self.limit_secs);
        let now = self.clock.now();

        if threshold.exceeded {
            let record = LockoutRecord {
                locked_at: now,
                elapsed_secs: next,
            };
            self.store.save(&record)?;
            self.elapsed_secs = next;
            self.phase = Phase::Locked;
            self.notifier.schedule_lockout_alert();
            return Ok(Some(Event::LockoutStarted {
                elapsed_secs: next,
                locked_at: now,
                at: now,
            }));
        }

        self.elapsed_secs = next;
        if threshold.near_limit {
            self.notifier.schedule_reminder(REMINDER_DELAY_SECS);
            return Ok(Some(Event::LimitReminder {
                elapsed_secs: next,
                limit_secs: self.limit_secs,
                at: now,
            }));
        }
        Ok(None)
    }

    /// Advance the early-unlock countdown by one second. Call at most
    /// once per `Cadence::Countdown` tick; a no-op unless a countdown
    /// is running. Reaching zero resets the session in the same tick:
    /// elapsed back to zero, record cleared, phase `Unlocked`.
    ///
    /// # Errors
    ///
    /// If clearing the record fails the countdown stays at one and the
    /// session stays pending; the next tick retries.
    pub fn tick_countdown(&mut self) -> Result<Option<Event>, CoreError> {
        let Phase::UnlockPending { remaining } = self.phase else {
            return Ok(None);
        };
        let now = self.clock.now();
        let next = remaining.saturating_sub(1);

        if next == 0 {
            self.store.clear()?;
            self.phase = Phase::Unlocked;
            self.elapsed_secs = 0;
            return Ok(Some(Event::SessionReset { at: now }));
        }

        self.phase = Phase::UnlockPending { remaining: next };
        Ok(Some(Event::UnlockCountdownTick {
            remaining_secs: next,
            at: now,
        }))
    }
}
