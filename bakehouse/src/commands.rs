//! Implementations of the `bakehouse` subcommands.
//!
//! Everything that touches the store is generic over [`ConnectionProvider`]
//! so the same code runs against Postgres and the in-memory backend in tests.

use std::path::Path;

use serde_json::Value;
use storefront::migrate::migrate_document;
use storefront::persistence::run_migrations;
use storefront::{CollectionCounts, ConnectionProvider, Document, DocumentBackend, PgConnectionProvider};

use crate::CliError;

/// What an inspected or imported document contains.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub counts: CollectionCounts,
    pub store_name: String,
    pub page_slugs: Vec<String>,
    /// Fields an on-read migration would backfill.
    pub backfilled: Vec<&'static str>,
    /// True when there was no stored document and the seed data is shown.
    pub seed: bool,
}

impl Summary {
    /// Human-readable report, one line per entry.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.seed {
            lines.push("No stored document; showing seed data".to_string());
        }
        lines.push(format!("Store: {}", self.store_name));

        let c = self.counts;
        for (name, count) in [
            ("products", c.products),
            ("categories", c.categories),
            ("orders", c.orders),
            ("promotions", c.promotions),
            ("messages", c.messages),
            ("reviews", c.reviews),
            ("pages", c.pages),
        ] {
            lines.push(format!("  {:<12}{}", name, count));
        }
        lines.push(format!("Pages: {}", self.page_slugs.join(", ")));

        if self.backfilled.is_empty() {
            lines.push("Schema: current".to_string());
        } else {
            lines.push(format!("Schema: missing {}", self.backfilled.join(", ")));
        }
        lines
    }
}

/// Migrate and type-check a raw document without writing anything.
///
/// `None` summarizes the seed document.
pub fn summarize(raw: Option<Value>) -> Result<Summary, CliError> {
    let Some(raw) = raw else {
        return Ok(summary_of(&Document::default(), Vec::new(), true));
    };

    let migrated = migrate_document(raw);
    let document: Document = serde_json::from_value(migrated.document)?;
    Ok(summary_of(&document, migrated.backfilled, false))
}

fn summary_of(document: &Document, backfilled: Vec<&'static str>, seed: bool) -> Summary {
    Summary {
        counts: document.counts(),
        store_name: document.settings.store_name.clone(),
        page_slugs: document.pages.iter().map(|p| p.slug.clone()).collect(),
        backfilled,
        seed,
    }
}

/// Parse a document export from disk.
pub fn read_document_file(path: &Path) -> Result<Value, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Summarize the stored document, read-only.
pub async fn inspect<P: ConnectionProvider>(provider: &P) -> Result<Summary, CliError> {
    let Some(backend) = provider.connection() else {
        tracing::warn!("No database configured");
        return summarize(None);
    };
    summarize(backend.fetch().await?)
}

/// Replace the stored document with `raw`.
///
/// The input is migrated and must convert into a [`Document`] before
/// anything is written. An existing row is only overwritten with `force`.
pub async fn import<P: ConnectionProvider>(
    provider: &P,
    raw: Value,
    force: bool,
) -> Result<Summary, CliError> {
    let backend = provider.connection().ok_or(CliError::NoDatabase)?;

    let migrated = migrate_document(raw);
    let document: Document = serde_json::from_value(migrated.document)?;

    if !force && backend.fetch().await?.is_some() {
        return Err(CliError::DocumentExists);
    }

    backend.upsert(&serde_json::to_value(&document)?).await?;
    tracing::info!(counts = ?document.counts(), "Imported store document");

    Ok(summary_of(&document, migrated.backfilled, false))
}

/// Write the seed document if no row exists. Returns true if it wrote.
pub async fn seed_if_missing<P: ConnectionProvider>(provider: &P) -> Result<bool, CliError> {
    let backend = provider.connection().ok_or(CliError::NoDatabase)?;
    if backend.fetch().await?.is_some() {
        return Ok(false);
    }
    backend
        .upsert(&serde_json::to_value(Document::default())?)
        .await?;
    Ok(true)
}

/// Create the `store_data` table and report whether the document row exists.
pub async fn setup_db(provider: &PgConnectionProvider, seed: bool) -> Result<Vec<String>, CliError> {
    let backend = provider.connection().ok_or(CliError::NoDatabase)?;
    run_migrations(backend.pool()).await?;

    let mut lines = vec!["Table store_data is ready".to_string()];
    if seed && seed_if_missing(provider).await? {
        lines.push("Wrote seed document".to_string());
    } else if backend.fetch().await?.is_some() {
        lines.push("Document row present".to_string());
    } else {
        lines.push("Document row absent; it is seeded on first read".to_string());
    }
    Ok(lines)
}

/// Which settings are present, never their values.
pub fn config_report(
    presence: &[(&'static str, bool)],
    selected_source: Option<&str>,
    production: bool,
    credential_kind: &str,
) -> Vec<String> {
    let mut lines: Vec<String> = presence
        .iter()
        .map(|(name, set)| format!("  {:<32}{}", name, if *set { "set" } else { "-" }))
        .collect();

    lines.push(format!(
        "Database: {}",
        selected_source.unwrap_or("none (seed data, writes discarded)")
    ));
    lines.push(format!(
        "Environment: {}",
        if production { "production" } else { "development" }
    ));
    lines.push(format!("Admin login: {}", credential_kind));
    lines
}
