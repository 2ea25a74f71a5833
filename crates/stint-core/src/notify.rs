//! Notification intent port.
//!
//! The core never delivers notifications itself. It emits fire-and-forget
//! intents toward whatever delivery subsystem the host wires in; no return
//! value is ever consumed. All methods default to no-ops so hosts only
//! implement the intents they care about.

/// Sink for notification intents emitted by the engine.
pub trait Notifier {
    /// Ask the platform for notification permission. Emitted once,
    /// when the engine is constructed.
    fn request_permission(&self) {}

    /// Schedule the near-limit reminder, to be shown `after_secs`
    /// seconds from now. Emitted exactly once per approach to the
    /// limit, when five minutes remain.
    fn schedule_reminder(&self, _after_secs: u64) {}

    /// Schedule the lockout alert. Emitted exactly when the session
    /// transitions to locked.
    fn schedule_lockout_alert(&self) {}
}

/// Notifier that drops every intent. Used by one-shot commands that
/// only read state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {}
