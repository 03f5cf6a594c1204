//! Storage backends for the singleton store document.
//!
//! The document lives in one row of one table:
//!
//! ```sql
//! store_data (id INTEGER PRIMARY KEY, data JSONB NOT NULL)  -- id = 1
//! ```
//!
//! A [`ConnectionProvider`] decides whether a backend is available at all;
//! a [`DocumentBackend`] reads and upserts the raw JSON value. Both are
//! static-dispatch traits so the [`DocumentStore`](crate::DocumentStore) can
//! run against Postgres in production and an in-memory backend in tests.

mod memory;
mod postgres;
mod provider;

pub use memory::{InMemoryBackend, InMemoryProvider};
pub use postgres::{run_migrations, PgDocumentBackend};
pub use provider::{ConnectionCandidate, PgConnectionProvider};

use serde_json::Value;
use std::future::Future;

/// Primary key of the one row holding the document.
pub const DOCUMENT_ROW_ID: i32 = 1;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("migration failed: {0}")]
    Migration(String),
}

/// Raw read/write access to the stored document.
///
/// Methods return `impl Future + Send` so callers can hold the futures across
/// `tokio::spawn` boundaries.
pub trait DocumentBackend: Send + Sync + 'static {
    /// Fetch the stored document, or `None` if the row does not exist yet.
    fn fetch(&self) -> impl Future<Output = Result<Option<Value>, PersistenceError>> + Send;

    /// Insert or replace the stored document.
    fn upsert(&self, data: &Value) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}

/// Source of the document backend.
///
/// Returns `None` when no backend is configured; callers then degrade to the
/// compiled-in default document instead of failing.
pub trait ConnectionProvider: Send + Sync + 'static {
    type Backend: DocumentBackend;

    fn connection(&self) -> Option<&Self::Backend>;
}
