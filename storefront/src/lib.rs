//! Storage and operation layer of the bakehouse storefront.
//!
//! The entire store (catalog, orders, messages, reviews, pages, settings)
//! is one JSON document kept in a single Postgres row. This crate owns:
//!
//! - [`model`]: the typed document,
//! - [`migrate`]: additive backfill of older document shapes,
//! - [`persistence`]: connection providers and row access,
//! - [`store`]: [`DocumentStore`] with fallback reads and background
//!   persistence of migrated documents,
//! - [`auth`]: signed admin sessions and password login,
//! - [`service`]: [`StoreService`], the named operations used by the HTTP
//!   API and the CLI.

pub mod auth;
pub mod config;
pub mod defaults;
pub mod migrate;
pub mod model;
pub mod persistence;
pub mod service;
pub mod store;

pub use auth::{AdminCredential, AuthError, SessionAuthenticator, SessionCookie};
pub use model::*;
pub use persistence::{
    ConnectionProvider, DocumentBackend, InMemoryBackend, InMemoryProvider, PersistenceError,
    PgConnectionProvider,
};
pub use service::{Diagnostics, Invalidation, PublicData, StoreError, StoreService};
pub use store::{DocumentStore, RetryPolicy, WriterStats};
