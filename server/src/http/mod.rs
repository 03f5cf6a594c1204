//! JSON API over the storefront operations.
//!
//! ## Routes
//!
//! Public:
//! - `GET /health`
//! - `GET /api/public`, `GET /api/products`, `GET /api/products/:id`,
//!   `GET /api/products/:id/reviews`, `GET /api/categories`, `GET /api/settings`,
//!   `GET /api/pages`, `GET /api/pages/:slug`
//! - `POST /api/coupons/validate`, `POST /api/orders`, `POST /api/messages`,
//!   `POST /api/reviews`
//!
//! Admin (session cookie `admin_session` required, except login/logout):
//! - `POST /api/admin/login`, `POST /api/admin/logout`
//! - `GET /api/admin/data`, `GET /api/admin/diagnostics`
//! - products, categories, orders, promotions, messages, reviews, pages and
//!   settings under `/api/admin/...` (see [`admin::routes`])

mod admin;
mod public;

use std::sync::Arc;

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use storefront::auth::session_token_from_cookie_header;
use storefront::{ConnectionProvider, StoreError, StoreService};

type SharedService<P> = Arc<StoreService<P>>;

/// Build the API router.
pub fn router<P: ConnectionProvider>(service: SharedService<P>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(public::routes::<P>())
        .merge(admin::routes::<P>())
        .with_state(service)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// The admin session token from the request's cookies, if any.
fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(session_token_from_cookie_header)
}

/// A [`StoreError`] rendered as a status code and `{ "error": ... }` body.
pub struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            StoreError::Unauthorized => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            StoreError::Invalid(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            StoreError::Persistence(e) => {
                tracing::error!("Request failed to persist: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to save changes".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let (app, _, _) = seeded();
        let (status, _, body) = send(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    #[test]
    fn test_session_token_from_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, "theme=dark".parse().unwrap());
        headers.append(COOKIE, "admin_session=abc.def".parse().unwrap());
        assert_eq!(session_token(&headers), Some("abc.def"));
        assert_eq!(session_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let cases = [
            (StoreError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                StoreError::NotFound {
                    entity: "product",
                    id: "9".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                StoreError::Invalid("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).into_response().status(), expected);
        }
    }
}
