//! Named operations over the store document.
//!
//! Admin operations take the caller's session token and authorize before
//! touching the store. Every mutation is a full read-modify-write of the
//! document followed by an [`Invalidation`] naming the pages that changed.

mod catalog;
mod messages;
mod orders;
mod pages;
mod promotions;
mod reviews;
mod settings;
mod views;

#[cfg(test)]
mod scenarios;

pub use views::{Diagnostics, PublicData};

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::auth::{AdminCredential, AuthError, SessionAuthenticator};
use crate::model::Document;
use crate::persistence::{ConnectionProvider, PersistenceError};
use crate::store::DocumentStore;

const INVALIDATION_CAPACITY: usize = 64;

/// Cache paths affected by mutations.
pub mod paths {
    pub const HOME: &str = "/";
    pub const SHOP: &str = "/shop";
    pub const ADMIN: &str = "/admin";
    pub const ADMIN_PRODUCTS: &str = "/admin/products";
    pub const ADMIN_CATEGORIES: &str = "/admin/categories";
    pub const ADMIN_ORDERS: &str = "/admin/orders";
    pub const ADMIN_PROMOTIONS: &str = "/admin/promotions";
    pub const ADMIN_MESSAGES: &str = "/admin/messages";
    pub const ADMIN_REVIEWS: &str = "/admin/reviews";
    pub const ADMIN_PAGES: &str = "/admin/pages";

    pub fn product(id: i64) -> String {
        format!("/product/{}", id)
    }

    pub fn legal(slug: &str) -> String {
        format!("/legal/{}", slug)
    }
}

/// Paths whose cached rendering is stale after a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invalidation {
    pub paths: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl StoreError {
    fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<AuthError> for StoreError {
    fn from(e: AuthError) -> Self {
        tracing::debug!("Authorization failed: {}", e);
        StoreError::Unauthorized
    }
}

/// Millisecond-clock ids that never repeat within a process, even when two
/// records are created in the same millisecond.
#[derive(Debug, Default)]
struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }
}

/// Current time as an ISO-8601 string with millisecond precision.
pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn require_text(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Invalid(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_amount(field: &str, value: f64) -> Result<(), StoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(StoreError::Invalid(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}

/// The operation surface of the storefront.
pub struct StoreService<P: ConnectionProvider> {
    store: DocumentStore<P>,
    sessions: SessionAuthenticator,
    credential: AdminCredential,
    invalidations: broadcast::Sender<Invalidation>,
    ids: IdGenerator,
}

impl<P: ConnectionProvider> StoreService<P> {
    pub fn new(
        store: DocumentStore<P>,
        sessions: SessionAuthenticator,
        credential: AdminCredential,
    ) -> Self {
        let (invalidations, _) = broadcast::channel(INVALIDATION_CAPACITY);
        Self {
            store,
            sessions,
            credential,
            invalidations,
            ids: IdGenerator::default(),
        }
    }

    pub fn store(&self) -> &DocumentStore<P> {
        &self.store
    }

    pub fn sessions(&self) -> &SessionAuthenticator {
        &self.sessions
    }

    /// Receive an [`Invalidation`] after every successful mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.invalidations.subscribe()
    }

    fn authorize(&self, session: Option<&str>) -> Result<(), StoreError> {
        self.sessions.ensure_authenticated(session)?;
        Ok(())
    }

    fn invalidate(&self, paths: Vec<String>) {
        tracing::debug!(?paths, "Invalidating cached paths");
        // No subscribers is fine.
        let _ = self.invalidations.send(Invalidation { paths });
    }

    /// Save the document, then announce the affected paths.
    async fn commit(&self, document: &Document, paths: Vec<String>) -> Result<(), StoreError> {
        self.store.save(document).await?;
        if !paths.is_empty() {
            self.invalidate(paths);
        }
        Ok(())
    }
}

fn owned(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_strictly_increasing() {
        let ids = IdGenerator::default();
        let mut previous = ids.next();
        for _ in 0..1000 {
            let next = ids.next();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_now_iso_format() {
        let now = now_iso();
        assert_eq!(now.len(), "2024-01-01T00:00:00.000Z".len());
        assert!(now.ends_with('Z'));
    }

    #[test]
    fn test_validation_helpers() {
        assert!(require_text("name", "Cake").is_ok());
        assert!(matches!(require_text("name", "  "), Err(StoreError::Invalid(_))));
        assert!(require_amount("price", 0.0).is_ok());
        assert!(require_amount("price", -1.0).is_err());
        assert!(require_amount("price", f64::NAN).is_err());
    }
}
