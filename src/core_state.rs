//! Transport-agnostic application state.
//!
//! `CoreState` is the single shared state between the HTTP API and the
//! in-process notification poller. Connections are opened per operation so
//! readers and writers never share a cached view; the announced set and the
//! per-dose lock registry are the only in-memory state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use thiserror::Error;

use crate::db;
use crate::db::DatabaseError;
use crate::notify::AnnouncedSet;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("state lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Per-(medicine, date) lock registry serializing toggle operations on the
/// same dose while leaving distinct doses independent.
#[derive(Default)]
pub struct DoseLocks {
    entries: Mutex<HashMap<(i64, NaiveDate), Arc<Mutex<()>>>>,
}

impl DoseLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the lock guarding one (medicine, date) pair. The
    /// caller holds the returned mutex for the duration of its
    /// read-modify-write sequence.
    pub fn lock_for(&self, medicine_id: i64, date: NaiveDate) -> Result<Arc<Mutex<()>>, CoreError> {
        let mut entries = self.entries.lock().map_err(|_| CoreError::LockPoisoned)?;
        Ok(entries
            .entry((medicine_id, date))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }
}

/// Shared application state.
///
/// Wrapped in `Arc` at startup so the HTTP server and the poller share the
/// same instance.
pub struct CoreState {
    db_path: PathBuf,
    announced: Mutex<AnnouncedSet>,
    dose_locks: DoseLocks,
}

impl CoreState {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            announced: Mutex::new(AnnouncedSet::new()),
            dose_locks: DoseLocks::new(),
        }
    }

    /// Open a database connection for one operation.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Acquire the announced-set lock. All announcement reads and writes go
    /// through this single guard.
    pub fn announced(&self) -> Result<MutexGuard<'_, AnnouncedSet>, CoreError> {
        self.announced.lock().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn dose_locks(&self) -> &DoseLocks {
        &self.dose_locks
    }
}
