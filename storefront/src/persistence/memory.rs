//! In-memory document backend for tests and dry runs.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::{ConnectionProvider, DocumentBackend, PersistenceError};

#[derive(Default)]
struct Shared {
    row: RwLock<Option<Value>>,
    fail_reads: AtomicBool,
    /// Number of upcoming writes that should fail.
    failing_writes: AtomicU32,
    reads: AtomicU64,
    writes: AtomicU64,
}

/// Holds the document row in memory. Clone-friendly via Arc; clones share the
/// same row.
///
/// Reads and writes can be made to fail to exercise the store's error paths.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    shared: Arc<Shared>,
}

impl InMemoryBackend {
    /// A backend with no row, like a freshly created table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose row already holds `data`.
    pub fn with_row(data: Value) -> Self {
        let backend = Self::new();
        backend.set_row(Some(data));
        backend
    }

    /// Current contents of the row.
    pub fn row(&self) -> Option<Value> {
        self.shared
            .row
            .read()
            .map(|row| row.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn set_row(&self, data: Option<Value>) {
        match self.shared.row.write() {
            Ok(mut row) => *row = data,
            Err(poisoned) => *poisoned.into_inner() = data,
        }
    }

    /// Number of fetches so far, failed ones included.
    pub fn read_count(&self) -> u64 {
        self.shared.reads.load(Ordering::SeqCst)
    }

    /// Number of successful upserts so far.
    pub fn write_count(&self) -> u64 {
        self.shared.writes.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.shared.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make the next `count` writes fail.
    pub fn fail_next_writes(&self, count: u32) {
        self.shared.failing_writes.store(count, Ordering::SeqCst);
    }

    fn take_write_failure(&self) -> bool {
        self.shared
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl DocumentBackend for InMemoryBackend {
    async fn fetch(&self) -> Result<Option<Value>, PersistenceError> {
        self.shared.reads.fetch_add(1, Ordering::SeqCst);
        if self.shared.fail_reads.load(Ordering::SeqCst) {
            return Err(PersistenceError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.row())
    }

    async fn upsert(&self, data: &Value) -> Result<(), PersistenceError> {
        if self.take_write_failure() {
            return Err(PersistenceError::Database(sqlx::Error::PoolTimedOut));
        }
        self.set_row(Some(data.clone()));
        self.shared.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Provider handing out an [`InMemoryBackend`], or nothing at all to model an
/// unconfigured deployment.
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    backend: Option<InMemoryBackend>,
}

impl InMemoryProvider {
    pub fn new(backend: InMemoryBackend) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A provider with no backend configured.
    pub fn unavailable() -> Self {
        Self { backend: None }
    }
}

impl ConnectionProvider for InMemoryProvider {
    type Backend = InMemoryBackend;

    fn connection(&self) -> Option<&InMemoryBackend> {
        self.backend.as_ref()
    }
}
