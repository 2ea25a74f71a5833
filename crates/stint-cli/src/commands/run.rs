//! Host the session engine.
//!
//! Restores the engine from the store, then multiplexes the two
//! one-second cadences and stdin commands on a single task. Every
//! event is printed to stdout as one JSON line; diagnostics go to
//! stderr via tracing.
//!
//! Stdin commands: `limit <seconds>`, `unlock`, `confirm`, `cancel`,
//! `status`, `quit`.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing_subscriber::EnvFilter;

use stint_core::session::day;
use stint_core::{
    Cadence, Config, Event, Notifier, NullNotifier, SessionEngine, SqliteLockoutStore, SystemClock,
};

/// Logs intents to stderr. Actual delivery belongs to the platform
/// notification subsystem wired in by a desktop shell.
struct IntentLog;

impl Notifier for IntentLog {
    fn request_permission(&self) {
        tracing::info!(intent = "request_permission", "notification intent");
    }

    fn schedule_reminder(&self, after_secs: u64) {
        tracing::info!(intent = "schedule_reminder", after_secs, "notification intent");
    }

    fn schedule_lockout_alert(&self) {
        tracing::info!(intent = "schedule_lockout_alert", "notification intent");
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load_or_default();
    let notifier: Box<dyn Notifier> = if config.notifications.enabled {
        Box::new(IntentLog)
    } else {
        Box::new(NullNotifier)
    };
    let mut engine = SessionEngine::restore(
        config.daily_limit_secs(),
        Box::new(SqliteLockoutStore::open()?),
        Box::new(SystemClock),
        notifier,
    )?;

    emit(&engine.snapshot())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(&mut engine))?;

    emit(&engine.snapshot())?;
    Ok(())
}

async fn drive(engine: &mut SessionEngine) -> Result<(), Box<dyn std::error::Error>> {
    // Independent one-second sources; neither is allowed to catch up
    // on missed firings, and nothing depends on their relative order
    // within a second.
    let mut usage = interval_at(
        Instant::now() + Cadence::Usage.period(),
        Cadence::Usage.period(),
    );
    usage.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut countdown = interval_at(
        Instant::now() + Cadence::Countdown.period(),
        Cadence::Countdown.period(),
    );
    countdown.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = usage.tick() => {
                match engine.tick_usage() {
                    Ok(Some(event)) => emit(&event)?,
                    Ok(None) => {}
                    Err(e) => {
                        tracing::error!(cadence = Cadence::Usage.name(), error = %e, "tick failed");
                    }
                }
            }
            _ = countdown.tick() => {
                match engine.tick_countdown() {
                    Ok(Some(event)) => emit(&event)?,
                    Ok(None) => {}
                    Err(e) => {
                        tracing::error!(cadence = Cadence::Countdown.name(), error = %e, "tick failed");
                    }
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if !dispatch(engine, line.trim())? {
                            return Ok(());
                        }
                    }
                    // stdin closed: keep ticking headless.
                    None => stdin_open = false,
                }
            }
        }
    }
}

/// Apply one stdin command. Returns `false` when the session should end.
fn dispatch(engine: &mut SessionEngine, line: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("limit") => match parts.next().and_then(|v| v.parse::<u32>().ok()) {
            Some(secs) => match engine.set_limit(secs) {
                Ok(event) => emit(&event)?,
                Err(e) => tracing::warn!(error = %e, "limit rejected"),
            },
            None => tracing::warn!("usage: limit <seconds>"),
        },
        Some("unlock") => {
            if let Some(event) = engine.request_early_unlock() {
                emit(&event)?;
            }
        }
        Some("confirm") => {
            if let Some(event) = engine.confirm_early_unlock() {
                emit(&event)?;
            }
        }
        Some("cancel") => {
            if let Some(event) = engine.cancel_early_unlock() {
                emit(&event)?;
            }
        }
        Some("status") => emit(&engine.snapshot())?,
        Some("quit") | Some("exit") => return Ok(false),
        Some(other) => tracing::warn!(command = other, "unknown command"),
        None => {}
    }
    Ok(true)
}

fn emit(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    match event {
        Event::LockoutStarted { .. } => {
            tracing::info!("locked for the rest of the day");
        }
        Event::StateSnapshot {
            seconds_until_midnight,
            ..
        } => {
            tracing::debug!(
                until_midnight = %day::format_hms(*seconds_until_midnight),
                "snapshot"
            );
        }
        _ => {}
    }
    Ok(())
}
