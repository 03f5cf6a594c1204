//! Read and write access to the singleton store document.

mod writer;

pub use writer::{MigrationWriter, RetryPolicy, SaveGuard, WriterStats};

use std::sync::Arc;

use crate::migrate::migrate_document;
use crate::model::Document;
use crate::persistence::{ConnectionProvider, DocumentBackend, PersistenceError};

/// Loads and saves the [`Document`].
///
/// [`get`](Self::get) never fails: without a backend, or when the stored value
/// cannot be read, callers get the compiled-in default document. Mutations
/// read through [`load_for_update`](Self::load_for_update) instead, so that a
/// fallback document is never saved over a row that exists. Saves replace the
/// whole document; concurrent read-modify-write cycles are last-writer-wins.
pub struct DocumentStore<P: ConnectionProvider> {
    provider: Arc<P>,
    writer: MigrationWriter,
}

impl<P: ConnectionProvider> DocumentStore<P> {
    /// Create a store and spawn its migration writer. Requires a Tokio runtime.
    pub fn new(provider: P) -> Self {
        Self::with_retry_policy(provider, RetryPolicy::default())
    }

    pub fn with_retry_policy(provider: P, policy: RetryPolicy) -> Self {
        let provider = Arc::new(provider);
        let writer = MigrationWriter::spawn(provider.clone(), policy);
        Self { provider, writer }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Whether a backend is configured.
    pub fn is_available(&self) -> bool {
        self.provider.connection().is_some()
    }

    pub fn writer_stats(&self) -> WriterStats {
        self.writer.stats()
    }

    /// Load the current document, migrating older shapes on the way.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self) -> Document {
        let Some(backend) = self.provider.connection() else {
            return Document::default();
        };

        match self.load(backend).await {
            Ok(document) => document,
            Err(e) => {
                tracing::error!("Failed to read store document, using defaults: {}", e);
                Document::default()
            }
        }
    }

    /// Load the document for a read-modify-write cycle.
    ///
    /// Unlike [`get`](Self::get), read failures and stored documents that do
    /// not convert into a [`Document`] are errors. Without a backend this is
    /// the default document, as saves are discarded anyway.
    #[tracing::instrument(skip(self))]
    pub async fn load_for_update(&self) -> Result<Document, PersistenceError> {
        let Some(backend) = self.provider.connection() else {
            return Ok(Document::default());
        };

        self.load(backend).await.inspect_err(|e| {
            tracing::error!("Refusing to modify unreadable store document: {}", e);
        })
    }

    async fn load(&self, backend: &P::Backend) -> Result<Document, PersistenceError> {
        let generation = self.writer.generation();
        let Some(raw) = backend.fetch().await? else {
            return self.seed(backend).await;
        };

        let migrated = migrate_document(raw);
        let document: Document = serde_json::from_value(migrated.document.clone())?;

        if migrated.is_modified() {
            tracing::info!(fields = ?migrated.backfilled, "Backfilled missing document fields");
            self.writer.schedule(migrated.document, generation);
        }

        Ok(document)
    }

    /// Write the seed document unless a save created the row meanwhile.
    async fn seed(&self, backend: &P::Backend) -> Result<Document, PersistenceError> {
        let _guard = self.writer.begin_save().await;
        if let Some(raw) = backend.fetch().await? {
            let migrated = migrate_document(raw);
            return Ok(serde_json::from_value(migrated.document)?);
        }

        tracing::info!("No store document found, writing seed document");
        let document = Document::default();
        backend.upsert(&serde_json::to_value(&document)?).await?;
        Ok(document)
    }

    /// Replace the stored document.
    ///
    /// A no-op (with a warning) when no backend is configured.
    #[tracing::instrument(skip_all)]
    pub async fn save(&self, document: &Document) -> Result<(), PersistenceError> {
        let Some(backend) = self.provider.connection() else {
            tracing::warn!("No database configured; changes are not persisted");
            return Ok(());
        };

        let value = serde_json::to_value(document)?;
        let _guard = self.writer.begin_save().await;
        backend.upsert(&value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{InMemoryBackend, InMemoryProvider};
    use crate::Product;
    use serde_json::json;
    use std::time::Duration;

    fn store_with(backend: &InMemoryBackend) -> DocumentStore<InMemoryProvider> {
        DocumentStore::with_retry_policy(
            InMemoryProvider::new(backend.clone()),
            RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(1),
            },
        )
    }

    async fn settle(store: &DocumentStore<InMemoryProvider>, done: impl Fn(WriterStats) -> bool) {
        for _ in 0..500 {
            if done(store.writer_stats()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("writer did not settle: {:?}", store.writer_stats());
    }

    #[tokio::test]
    async fn test_get_without_backend_returns_defaults() {
        let store = DocumentStore::new(InMemoryProvider::unavailable());
        assert!(!store.is_available());
        assert_eq!(store.get().await, Document::default());
    }

    #[tokio::test]
    async fn test_save_without_backend_is_noop() {
        let store = DocumentStore::new(InMemoryProvider::unavailable());
        store.save(&Document::default()).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_row_is_seeded() {
        let backend = InMemoryBackend::new();
        let store = store_with(&backend);

        let document = store.get().await;

        assert_eq!(document, Document::default());
        assert_eq!(backend.write_count(), 1);
        assert_eq!(
            backend.row(),
            Some(serde_json::to_value(Document::default()).unwrap())
        );
    }

    #[tokio::test]
    async fn test_legacy_document_is_migrated_and_persisted() {
        let backend = InMemoryBackend::with_row(json!({}));
        let store = store_with(&backend);

        let document = store.get().await;
        assert_eq!(document, Document::default());

        settle(&store, |s| s.persisted == 1).await;
        let stored: Document = serde_json::from_value(backend.row().unwrap()).unwrap();
        assert_eq!(stored, Document::default());
    }

    #[tokio::test]
    async fn test_current_document_schedules_nothing() {
        let backend = InMemoryBackend::with_row(serde_json::to_value(Document::default()).unwrap());
        let store = store_with(&backend);

        store.get().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(store.writer_stats(), WriterStats::default());
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn test_read_error_returns_defaults() {
        let backend = InMemoryBackend::with_row(json!({ "products": [] }));
        backend.fail_reads(true);
        let store = store_with(&backend);

        assert_eq!(store.get().await, Document::default());
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn test_untypeable_document_returns_defaults() {
        let backend = InMemoryBackend::with_row(json!({ "products": "not a list" }));
        let store = store_with(&backend);

        assert_eq!(store.get().await, Document::default());
        assert_eq!(store.writer_stats().scheduled, 0);
    }

    #[tokio::test]
    async fn test_save_then_get_roundtrips() {
        let backend = InMemoryBackend::new();
        let store = store_with(&backend);

        let mut document = store.get().await;
        document.products.truncate(1);
        document.settings.store_name = "Renamed".to_string();
        store.save(&document).await.unwrap();

        assert_eq!(store.get().await, document);
    }

    #[tokio::test]
    async fn test_save_errors_propagate() {
        let backend = InMemoryBackend::new();
        let store = store_with(&backend);
        backend.fail_next_writes(1);

        assert!(store.save(&Document::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let backend = InMemoryBackend::with_row(serde_json::to_value(Document::default()).unwrap());
        let store = store_with(&backend);

        let mut first = store.get().await;
        let mut second = store.get().await;

        first.products.push(Product {
            id: 100,
            name: "First".to_string(),
            ..first.products[0].clone()
        });
        second.products.push(Product {
            id: 200,
            name: "Second".to_string(),
            ..second.products[0].clone()
        });

        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();

        let stored = store.get().await;
        assert!(stored.products.iter().any(|p| p.id == 200));
        assert!(!stored.products.iter().any(|p| p.id == 100));
    }

    #[tokio::test]
    async fn test_unknown_fields_survive_migration() {
        let backend = InMemoryBackend::with_row(json!({ "legacyFlag": true }));
        let store = store_with(&backend);

        let document = store.get().await;
        assert_eq!(document.extra.get("legacyFlag"), Some(&json!(true)));

        settle(&store, |s| s.persisted == 1).await;
        assert_eq!(backend.row().unwrap()["legacyFlag"], json!(true));
    }

    #[tokio::test]
    async fn test_load_for_update_rejects_untypeable_document() {
        let raw = json!({
            "orders": [],
            "reviews": [{ "id": "r1", "productId": 1, "userName": "A", "rating": 4.5 }]
        });
        let backend = InMemoryBackend::with_row(raw.clone());
        let store = store_with(&backend);

        assert!(matches!(
            store.load_for_update().await,
            Err(PersistenceError::Json(_))
        ));
        assert_eq!(store.get().await, Document::default());
        assert_eq!(backend.row(), Some(raw));
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn test_load_for_update_propagates_read_errors() {
        let backend = InMemoryBackend::with_row(json!({}));
        backend.fail_reads(true);
        let store = store_with(&backend);

        assert!(store.load_for_update().await.is_err());

        let unconfigured = DocumentStore::new(InMemoryProvider::unavailable());
        assert_eq!(unconfigured.load_for_update().await.unwrap(), Document::default());
    }

    #[tokio::test]
    async fn test_save_during_migration_backoff_survives() {
        let backend = InMemoryBackend::with_row(json!({ "products": [] }));
        backend.fail_next_writes(1);
        let store = DocumentStore::with_retry_policy(
            InMemoryProvider::new(backend.clone()),
            RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(50),
            },
        );

        let mut document = store.get().await;
        settle(&store, |s| s.failed_attempts == 1).await;

        document.settings.store_name = "Saved by admin".to_string();
        store.save(&document).await.unwrap();

        settle(&store, |s| s.superseded == 1).await;
        assert_eq!(store.writer_stats().persisted, 0);
        assert_eq!(
            backend.row().unwrap()["settings"]["storeName"],
            json!("Saved by admin")
        );
    }
}
