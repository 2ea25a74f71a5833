//! Day-scoped lockout record persistence.
//!
//! At most one record exists at a time. Its absence means "no active
//! lockout"; a record written on a previous calendar day is stale and
//! gets discarded at load time by the engine. An unreadable record is
//! treated the same as a missing one - the system fails open to the
//! unlocked state rather than refusing to start.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

use super::database::Database;

const LOCKOUT_KEY: &str = "lockout_record";

/// The persisted lockout record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutRecord {
    /// When the session locked. Compared by local calendar day.
    pub locked_at: DateTime<Utc>,
    /// Elapsed usage seconds at the moment of lockout.
    pub elapsed_secs: u64,
}

/// Persistence port for the lockout record.
///
/// `save` followed by `load` returns the exact saved values; `load`
/// after `clear` or before any `save` returns `None`. Implementations
/// must make writes atomic relative to reads.
pub trait LockoutStore {
    fn save(&self, record: &LockoutRecord) -> Result<(), StorageError>;
    fn load(&self) -> Result<Option<LockoutRecord>, StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// SQLite-backed store: the record is one JSON value in the kv table,
/// written with a single upsert statement.
pub struct SqliteLockoutStore {
    db: Database,
}

impl SqliteLockoutStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the store over the default database location.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self::new(Database::open()?))
    }
}

impl LockoutStore for SqliteLockoutStore {
    fn save(&self, record: &LockoutRecord) -> Result<(), StorageError> {
        let json = serde_json::to_string(record)?;
        self.db.kv_set(LOCKOUT_KEY, &json)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<LockoutRecord>, StorageError> {
        let Some(json) = self.db.kv_get(LOCKOUT_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(record) => Ok(Some(record)),
            Err(_) => {
                // Unreadable record: drop it and report absence.
                self.db.kv_delete(LOCKOUT_KEY)?;
                Ok(None)
            }
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.db.kv_delete(LOCKOUT_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn store() -> SqliteLockoutStore {
        SqliteLockoutStore::new(Database::open_memory().unwrap())
    }

    fn record() -> LockoutRecord {
        LockoutRecord {
            locked_at: Utc.with_ymd_and_hms(2024, 5, 10, 14, 30, 0).unwrap(),
            elapsed_secs: 3600,
        }
    }

    #[test]
    fn load_before_any_save_is_none() {
        assert_eq!(store().load().unwrap(), None);
    }

    #[test]
    fn save_load_roundtrip_is_exact() {
        let store = store();
        store.save(&record()).unwrap();
        assert_eq!(store.load().unwrap(), Some(record()));
    }

    #[test]
    fn save_overwrites_the_previous_record() {
        let store = store();
        store.save(&record()).unwrap();
        let newer = LockoutRecord {
            elapsed_secs: 7200,
            ..record()
        };
        store.save(&newer).unwrap();
        assert_eq!(store.load().unwrap(), Some(newer));
    }

    #[test]
    fn clear_then_load_is_none() {
        let store = store();
        store.save(&record()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing an empty store is fine.
        store.clear().unwrap();
    }

    #[test]
    fn malformed_record_reads_as_absent_and_is_removed() {
        let db = Database::open_memory().unwrap();
        db.kv_set(LOCKOUT_KEY, "{not json").unwrap();
        let store = SqliteLockoutStore::new(db);
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.db.kv_get(LOCKOUT_KEY).unwrap(), None);
    }
}
