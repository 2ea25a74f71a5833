//! # Stint Core Library
//!
//! This library provides the core business logic for Stint, a daily
//! usage-stint tracker. It counts elapsed usage seconds against a
//! configurable daily limit, enforces a lockout once the limit is
//! reached, persists that lockout for the rest of the calendar day,
//! and offers a deliberately slow early-exit path.
//!
//! It implements a CLI-first philosophy: all operations are available
//! via a standalone CLI binary, with any GUI being a thin presentation
//! layer over the same core library.
//!
//! ## Architecture
//!
//! - **Session Engine**: A caller-driven state machine. Nothing inside
//!   the core sleeps or spawns threads -- the host invokes
//!   `tick_usage()` and `tick_countdown()` on the named cadences
//! - **Storage**: SQLite-backed lockout record and TOML-based
//!   configuration
//! - **Ports**: the persistence store, clock, and notification sink are
//!   injected traits, so the engine is fully deterministic under test
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: lockout state machine and read model
//! - [`LockoutStore`]: day-scoped lockout record persistence port
//! - [`Clock`] / [`Cadence`]: injectable time source and named timers
//! - [`Notifier`]: fire-and-forget notification intents
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod session;
pub mod storage;

pub use clock::{Cadence, Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use notify::{Notifier, NullNotifier};
pub use session::{Phase, SessionEngine, Threshold};
pub use storage::{Config, Database, LockoutRecord, LockoutStore, SqliteLockoutStore};
