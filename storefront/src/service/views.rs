use std::collections::BTreeMap;

use serde::Serialize;

use super::{owned, paths, StoreError, StoreService};
use crate::auth::SessionCookie;
use crate::config;
use crate::model::{Category, CollectionCounts, Document, Product, Promotion, Settings};
use crate::persistence::ConnectionProvider;
use crate::store::WriterStats;

/// What anonymous visitors may see. Orders, messages, reviews and inactive
/// promotions are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicData {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub promotions: Vec<Promotion>,
    pub settings: Settings,
}

/// Operational snapshot for the admin debug view. Never contains secrets.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub env: BTreeMap<&'static str, bool>,
    pub backend_available: bool,
    pub login: &'static str,
    pub counts: CollectionCounts,
    /// True when the loaded document equals the compiled-in seed.
    pub using_seed_data: bool,
    pub migration_writer: WriterStats,
}

impl<P: ConnectionProvider> StoreService<P> {
    pub async fn get_public_data(&self) -> PublicData {
        let document = self.store.get().await;
        PublicData {
            products: document.products,
            categories: document.categories,
            promotions: document
                .promotions
                .into_iter()
                .filter(|p| p.is_active)
                .collect(),
            settings: document.settings,
        }
    }

    /// The whole document.
    pub async fn get_admin_data(&self, session: Option<&str>) -> Result<Document, StoreError> {
        self.authorize(session)?;
        Ok(self.store.get().await)
    }

    /// Check the admin password and issue a session cookie.
    pub async fn login(&self, password: &str) -> Result<SessionCookie, StoreError> {
        match self.credential.verify(password).await {
            Ok(()) => {
                tracing::info!("Admin logged in");
                Ok(self.sessions.create_session())
            }
            Err(e) => {
                tracing::warn!("Admin login failed: {}", e);
                Err(StoreError::Unauthorized)
            }
        }
    }

    /// A cookie that ends the session. Tokens are not revoked server-side.
    pub fn logout(&self) -> SessionCookie {
        self.invalidate(owned(&[paths::ADMIN]));
        self.sessions.destroy_session()
    }

    pub async fn diagnostics(&self, session: Option<&str>) -> Result<Diagnostics, StoreError> {
        self.authorize(session)?;

        let document = self.store.get().await;
        Ok(Diagnostics {
            env: config::env_presence().into_iter().collect(),
            backend_available: self.store.is_available(),
            login: self.credential.kind(),
            counts: document.counts(),
            using_seed_data: document == Document::default(),
            migration_writer: self.store.writer_stats(),
        })
    }
}
