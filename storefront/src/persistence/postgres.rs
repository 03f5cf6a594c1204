//! Postgres-backed document storage.

use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{DocumentBackend, PersistenceError, DOCUMENT_ROW_ID};

const SELECT_DOCUMENT: &str = "SELECT data FROM store_data WHERE id = $1 LIMIT 1";

const UPSERT_DOCUMENT: &str = r#"
    INSERT INTO store_data (id, data)
    VALUES ($1, $2)
    ON CONFLICT (id)
    DO UPDATE SET data = EXCLUDED.data
"#;

/// Reads and writes the document row through a shared pool.
#[derive(Clone)]
pub struct PgDocumentBackend {
    pool: PgPool,
}

impl PgDocumentBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl DocumentBackend for PgDocumentBackend {
    async fn fetch(&self) -> Result<Option<Value>, PersistenceError> {
        tracing::debug!("Reading store document");
        let row: Option<(Json<Value>,)> = sqlx::query_as(SELECT_DOCUMENT)
            .bind(DOCUMENT_ROW_ID)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(Json(data),)| data))
    }

    async fn upsert(&self, data: &Value) -> Result<(), PersistenceError> {
        tracing::debug!("Writing store document");
        sqlx::query(UPSERT_DOCUMENT)
            .bind(DOCUMENT_ROW_ID)
            .bind(Json(data))
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Run embedded migrations from `storefront/migrations/`. Creates the
/// `store_data` table if needed; never touches an existing row.
pub async fn run_migrations(pool: &PgPool) -> Result<(), PersistenceError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| PersistenceError::Migration(e.to_string()))?;
    Ok(())
}
