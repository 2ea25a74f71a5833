//! End-to-end lifecycle tests driving the engine against a real
//! SQLite-backed store with a manual clock. No test here sleeps.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use stint_core::{
    Clock, Database, Event, LockoutRecord, LockoutStore, ManualClock, Notifier, Phase,
    SessionEngine, SqliteLockoutStore,
};

#[derive(Default, Clone)]
struct Recorder {
    intents: Rc<RefCell<Vec<String>>>,
}

impl Notifier for Recorder {
    fn request_permission(&self) {
        self.intents.borrow_mut().push("permission".into());
    }

    fn schedule_reminder(&self, after_secs: u64) {
        self.intents
            .borrow_mut()
            .push(format!("reminder:{after_secs}"));
    }

    fn schedule_lockout_alert(&self) {
        self.intents.borrow_mut().push("lockout".into());
    }
}

fn open_store(path: &Path) -> SqliteLockoutStore {
    SqliteLockoutStore::new(Database::open_at(path).unwrap())
}

fn test_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap()
}

fn restore(path: &Path, limit: u32, clock: &ManualClock, recorder: &Recorder) -> SessionEngine {
    SessionEngine::restore(
        limit,
        Box::new(open_store(path)),
        Box::new(clock.clone()),
        Box::new(recorder.clone()),
    )
    .unwrap()
}

#[test]
fn lockout_lands_exactly_on_the_limit_tick() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("stint.db");
    let clock = ManualClock::new(test_day());
    let mut engine = restore(&db, 600, &clock, &Recorder::default());

    let mut locked_on = None;
    for tick in 1..=600u32 {
        clock.advance(Duration::seconds(1));
        if let Some(Event::LockoutStarted { .. }) = engine.tick_usage().unwrap() {
            assert!(locked_on.is_none(), "locked twice");
            locked_on = Some(tick);
        }
    }
    assert_eq!(locked_on, Some(600));
    assert_eq!(engine.phase(), Phase::Locked);
    assert_eq!(engine.elapsed_secs(), 600);
}

#[test]
fn reminder_fires_exactly_once_on_tick_300() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("stint.db");
    let clock = ManualClock::new(test_day());
    let recorder = Recorder::default();
    let mut engine = restore(&db, 600, &clock, &recorder);

    let mut reminder_ticks = Vec::new();
    for tick in 1..=600u32 {
        clock.advance(Duration::seconds(1));
        if let Some(Event::LimitReminder { .. }) = engine.tick_usage().unwrap() {
            reminder_ticks.push(tick);
        }
    }
    assert_eq!(reminder_ticks, vec![300]);
    let reminders = recorder
        .intents
        .borrow()
        .iter()
        .filter(|i| *i == "reminder:5")
        .count();
    assert_eq!(reminders, 1);
}

#[test]
fn restart_on_the_same_day_restores_the_lockout() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("stint.db");
    let clock = ManualClock::new(test_day());

    let mut engine = restore(&db, 600, &clock, &Recorder::default());
    for _ in 0..600 {
        engine.tick_usage().unwrap();
    }
    assert_eq!(engine.phase(), Phase::Locked);
    drop(engine);

    // Same day, two hours later.
    clock.advance(Duration::hours(2));
    let engine = restore(&db, 600, &clock, &Recorder::default());
    assert_eq!(engine.phase(), Phase::Locked);
    assert_eq!(engine.elapsed_secs(), 600);
}

#[test]
fn restart_with_yesterdays_record_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("stint.db");
    let clock = ManualClock::new(test_day());

    // A lockout written 25 hours ago is on a previous calendar day.
    open_store(&db)
        .save(&LockoutRecord {
            locked_at: clock.now() - Duration::hours(25),
            elapsed_secs: 600,
        })
        .unwrap();

    let engine = restore(&db, 600, &clock, &Recorder::default());
    assert_eq!(engine.phase(), Phase::Unlocked);
    assert_eq!(engine.elapsed_secs(), 0);

    // The stale record was cleared, not merely ignored.
    assert_eq!(open_store(&db).load().unwrap(), None);
}

#[test]
fn confirmed_early_unlock_resets_after_ten_ticks() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("stint.db");
    let clock = ManualClock::new(test_day());
    let mut engine = restore(&db, 600, &clock, &Recorder::default());

    for _ in 0..600 {
        engine.tick_usage().unwrap();
    }
    assert_eq!(engine.phase(), Phase::Locked);
    assert!(open_store(&db).load().unwrap().is_some());

    engine.request_early_unlock().unwrap();
    engine.confirm_early_unlock().unwrap();

    for _ in 0..9 {
        clock.advance(Duration::seconds(1));
        engine.tick_countdown().unwrap();
    }
    // Still locked out with one second to go.
    assert_eq!(engine.phase(), Phase::UnlockPending { remaining: 1 });

    clock.advance(Duration::seconds(1));
    let event = engine.tick_countdown().unwrap();
    assert!(matches!(event, Some(Event::SessionReset { .. })));
    assert_eq!(engine.phase(), Phase::Unlocked);
    assert_eq!(engine.elapsed_secs(), 0);
    assert_eq!(open_store(&db).load().unwrap(), None);
}

#[test]
fn lockout_alert_intent_fires_with_the_lockout() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("stint.db");
    let clock = ManualClock::new(test_day());
    let recorder = Recorder::default();
    let mut engine = restore(&db, 600, &clock, &recorder);

    for _ in 0..600 {
        engine.tick_usage().unwrap();
    }

    let intents = recorder.intents.borrow();
    assert_eq!(intents.first().map(String::as_str), Some("permission"));
    assert_eq!(intents.iter().filter(|i| *i == "lockout").count(), 1);
}

#[test]
fn next_day_restart_after_overnight_lockout_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("stint.db");
    let clock = ManualClock::new(test_day());

    let mut engine = restore(&db, 600, &clock, &Recorder::default());
    for _ in 0..600 {
        engine.tick_usage().unwrap();
    }

    // The running process never re-evaluates the day boundary: ticks
    // past midnight leave the lockout in place.
    clock.advance(Duration::hours(25));
    assert!(engine.tick_usage().unwrap().is_none());
    assert_eq!(engine.phase(), Phase::Locked);
    drop(engine);

    // A restart on the new day does start fresh.
    let engine = restore(&db, 600, &clock, &Recorder::default());
    assert_eq!(engine.phase(), Phase::Unlocked);
    assert_eq!(engine.elapsed_secs(), 0);
    assert_eq!(open_store(&db).load().unwrap(), None);
}

#[test]
fn lowered_limit_locks_on_the_next_tick() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("stint.db");
    let clock = ManualClock::new(test_day());
    let mut engine = restore(&db, 600, &clock, &Recorder::default());

    for _ in 0..400 {
        engine.tick_usage().unwrap();
    }
    engine.set_limit(350).unwrap();
    assert_eq!(engine.phase(), Phase::Unlocked);

    let event = engine.tick_usage().unwrap();
    assert!(matches!(event, Some(Event::LockoutStarted { .. })));
    assert_eq!(engine.elapsed_secs(), 401);
}
