mod config;
mod http;

use std::sync::Arc;

use storefront::{
    AdminCredential, DocumentStore, PgConnectionProvider, SessionAuthenticator, StoreService,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with span durations
    use tracing_subscriber::fmt::format::FmtSpan;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!("Starting bakehouse API server");

    let provider = PgConnectionProvider::from_env();
    let store = DocumentStore::new(provider);
    if !store.is_available() {
        tracing::warn!("No database configured; serving seed data and discarding writes");
    }

    let sessions = SessionAuthenticator::from_env()?;
    let credential = AdminCredential::from_env();
    tracing::info!("Admin login: {:?}", credential);

    let service = Arc::new(StoreService::new(store, sessions, credential));

    // Page caches live outside this process; log what a front end would refresh
    let mut invalidations = service.subscribe();
    tokio::spawn(async move {
        loop {
            match invalidations.recv().await {
                Ok(event) => tracing::debug!(paths = ?event.paths, "Invalidated"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Invalidation listener lagged by {} events", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let addr = config::get_listen_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, http::router(service)).await?;

    Ok(())
}
