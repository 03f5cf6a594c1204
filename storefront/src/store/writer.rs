//! Background persistence of migrated documents.
//!
//! A read that backfills fields returns immediately; the migrated value is
//! handed to a long-lived task that writes it with bounded retries. Only the
//! latest pending document is kept.
//!
//! Full saves and migration writes share a [`WriteGate`]. A save bumps the
//! gate's generation, and a migrated document read under an older generation
//! is dropped instead of written, even when it is mid-retry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::{watch, Mutex, MutexGuard};

use crate::persistence::{ConnectionProvider, DocumentBackend};

/// Retry schedule for background writes. Delay doubles after each failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after the given (1-indexed) failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Snapshot of the writer's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriterStats {
    pub scheduled: u64,
    pub persisted: u64,
    pub failed_attempts: u64,
    pub abandoned: u64,
    /// Migrated documents dropped because a full save replaced the row.
    pub superseded: u64,
}

#[derive(Default)]
struct Counters {
    scheduled: AtomicU64,
    persisted: AtomicU64,
    failed_attempts: AtomicU64,
    abandoned: AtomicU64,
    superseded: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> WriterStats {
        WriterStats {
            scheduled: self.scheduled.load(Ordering::Relaxed),
            persisted: self.persisted.load(Ordering::Relaxed),
            failed_attempts: self.failed_attempts.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
            superseded: self.superseded.load(Ordering::Relaxed),
        }
    }
}

/// Serializes row writes and counts full saves.
#[derive(Default)]
struct WriteGate {
    lock: Mutex<()>,
    generation: AtomicU64,
}

/// A migrated document and the save generation it was read under.
#[derive(Clone)]
struct Pending {
    generation: u64,
    document: Value,
}

/// Held by a full save while it writes. Migration writes wait for it.
pub struct SaveGuard<'a> {
    _lock: MutexGuard<'a, ()>,
}

/// Handle to the writer task. The task exits when the handle is dropped.
pub struct MigrationWriter {
    slot: watch::Sender<Option<Pending>>,
    gate: Arc<WriteGate>,
    counters: Arc<Counters>,
}

impl MigrationWriter {
    /// Spawn the writer task. Must be called from within a Tokio runtime.
    pub fn spawn<P: ConnectionProvider>(provider: Arc<P>, policy: RetryPolicy) -> Self {
        let (slot, rx) = watch::channel(None);
        let gate = Arc::new(WriteGate::default());
        let counters = Arc::new(Counters::default());

        tokio::spawn(run_writer(provider, rx, policy, gate.clone(), counters.clone()));

        Self {
            slot,
            gate,
            counters,
        }
    }

    /// Current save generation. Read it before fetching the row that a
    /// later [`schedule`](Self::schedule) call will migrate.
    pub fn generation(&self) -> u64 {
        self.gate.generation.load(Ordering::SeqCst)
    }

    /// Queue a document read under `generation`, replacing any pending one.
    pub fn schedule(&self, document: Value, generation: u64) {
        self.counters.scheduled.fetch_add(1, Ordering::Relaxed);
        self.slot.send_replace(Some(Pending {
            generation,
            document,
        }));
    }

    /// Start a full save: waits for any in-flight migration write, marks
    /// every migrated document read so far as stale and drops the pending
    /// one. Hold the guard until the save's write finishes.
    pub async fn begin_save(&self) -> SaveGuard<'_> {
        let lock = self.gate.lock.lock().await;
        self.gate.generation.fetch_add(1, Ordering::SeqCst);
        self.slot.send_if_modified(|pending| pending.take().is_some());
        SaveGuard { _lock: lock }
    }

    pub fn stats(&self) -> WriterStats {
        self.counters.snapshot()
    }
}

async fn run_writer<P: ConnectionProvider>(
    provider: Arc<P>,
    mut rx: watch::Receiver<Option<Pending>>,
    policy: RetryPolicy,
    gate: Arc<WriteGate>,
    counters: Arc<Counters>,
) {
    tracing::debug!("Migration writer started");

    while rx.changed().await.is_ok() {
        let pending = rx.borrow_and_update().clone();
        let Some(pending) = pending else {
            continue;
        };

        let Some(backend) = provider.connection() else {
            tracing::warn!("No database available, dropping migrated document");
            counters.abandoned.fetch_add(1, Ordering::Relaxed);
            continue;
        };

        persist_with_retry(backend, &pending, policy, &gate, &counters).await;
    }

    tracing::debug!("Migration writer exiting");
}

async fn persist_with_retry<B: DocumentBackend>(
    backend: &B,
    pending: &Pending,
    policy: RetryPolicy,
    gate: &WriteGate,
    counters: &Counters,
) {
    for attempt in 1..=policy.max_attempts {
        let result = {
            let _lock = gate.lock.lock().await;
            if gate.generation.load(Ordering::SeqCst) != pending.generation {
                counters.superseded.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(attempt, "Migrated document superseded by a save, dropping it");
                return;
            }
            backend.upsert(&pending.document).await
        };

        match result {
            Ok(()) => {
                counters.persisted.fetch_add(1, Ordering::Relaxed);
                tracing::info!(attempt, "Persisted migrated store document");
                return;
            }
            Err(e) => {
                counters.failed_attempts.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(attempt, max_attempts = policy.max_attempts, "Failed to persist migrated document: {}", e);
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.delay_after(attempt)).await;
                }
            }
        }
    }

    counters.abandoned.fetch_add(1, Ordering::Relaxed);
    tracing::error!("Giving up on migrated document; the next read will retry the migration");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{InMemoryBackend, InMemoryProvider};
    use serde_json::json;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
        }
    }

    async fn wait_until(writer: &MigrationWriter, done: impl Fn(WriterStats) -> bool) -> WriterStats {
        for _ in 0..500 {
            let stats = writer.stats();
            if done(stats) {
                return stats;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("writer did not settle: {:?}", writer.stats());
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_persists_scheduled_document() {
        let backend = InMemoryBackend::new();
        let writer = MigrationWriter::spawn(Arc::new(InMemoryProvider::new(backend.clone())), fast_policy());

        writer.schedule(json!({ "products": [] }), writer.generation());
        let stats = wait_until(&writer, |s| s.persisted == 1).await;

        assert_eq!(stats.scheduled, 1);
        assert_eq!(stats.failed_attempts, 0);
        assert_eq!(backend.row(), Some(json!({ "products": [] })));
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let backend = InMemoryBackend::new();
        backend.fail_next_writes(2);
        let writer = MigrationWriter::spawn(Arc::new(InMemoryProvider::new(backend.clone())), fast_policy());

        writer.schedule(json!({ "a": 1 }), writer.generation());
        let stats = wait_until(&writer, |s| s.persisted == 1).await;

        assert_eq!(stats.failed_attempts, 2);
        assert_eq!(stats.abandoned, 0);
        assert_eq!(backend.write_count(), 1);
    }

    #[tokio::test]
    async fn test_abandons_after_max_attempts() {
        let backend = InMemoryBackend::new();
        backend.fail_next_writes(10);
        let writer = MigrationWriter::spawn(Arc::new(InMemoryProvider::new(backend.clone())), fast_policy());

        writer.schedule(json!({ "a": 1 }), writer.generation());
        let stats = wait_until(&writer, |s| s.abandoned == 1).await;

        assert_eq!(stats.failed_attempts, 3);
        assert_eq!(stats.persisted, 0);
        assert_eq!(backend.row(), None);
    }

    #[tokio::test]
    async fn test_unavailable_backend_abandons() {
        let writer = MigrationWriter::spawn(Arc::new(InMemoryProvider::unavailable()), fast_policy());
        writer.schedule(json!({}), writer.generation());
        let stats = wait_until(&writer, |s| s.abandoned == 1).await;
        assert_eq!(stats.persisted, 0);
    }

    #[tokio::test]
    async fn test_stale_generation_is_dropped() {
        let backend = InMemoryBackend::new();
        let writer = MigrationWriter::spawn(Arc::new(InMemoryProvider::new(backend.clone())), fast_policy());

        let read_at = writer.generation();
        drop(writer.begin_save().await);
        writer.schedule(json!({ "stale": true }), read_at);

        let stats = wait_until(&writer, |s| s.superseded == 1).await;
        assert_eq!(stats.persisted, 0);
        assert_eq!(backend.row(), None);
    }

    #[tokio::test]
    async fn test_save_during_backoff_stops_retries() {
        let backend = InMemoryBackend::new();
        backend.fail_next_writes(1);
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
        };
        let writer = MigrationWriter::spawn(Arc::new(InMemoryProvider::new(backend.clone())), policy);

        writer.schedule(json!({ "migrated": true }), writer.generation());
        wait_until(&writer, |s| s.failed_attempts == 1).await;

        {
            let _guard = writer.begin_save().await;
            backend.set_row(Some(json!({ "saved": true })));
        }

        let stats = wait_until(&writer, |s| s.superseded == 1).await;
        assert_eq!(stats.persisted, 0);
        assert_eq!(stats.abandoned, 0);
        assert_eq!(backend.row(), Some(json!({ "saved": true })));
    }
}
