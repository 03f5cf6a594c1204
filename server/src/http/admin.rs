use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use storefront::{
    Category, CategoryPatch, ConnectionProvider, Diagnostics, Document, Message, NewCategory,
    NewPage, NewProduct, NewPromotion, Order, OrderStatus, Page, PagePatch, Product, ProductPatch,
    Promotion, PromotionPatch, Review, ReviewStatus, Settings, SettingsPatch,
};

use super::{session_token, ApiResult, SharedService};

/// Admin routes. Everything except login and logout requires a session.
///
/// - `POST /api/admin/login`, `POST /api/admin/logout`
/// - `GET /api/admin/data`, `GET /api/admin/diagnostics`
/// - `POST /api/admin/products`, `PATCH|DELETE /api/admin/products/:id`
/// - `POST /api/admin/categories`, `PATCH|DELETE /api/admin/categories/:id`
/// - `GET /api/admin/orders`, `PATCH /api/admin/orders/:id/status`,
///   `DELETE /api/admin/orders/:id`
/// - `GET|POST /api/admin/promotions`, `PATCH|DELETE /api/admin/promotions/:id`,
///   `POST /api/admin/promotions/:id/active`
/// - `GET /api/admin/messages`, `POST /api/admin/messages/:id/read`,
///   `DELETE /api/admin/messages/:id`
/// - `GET /api/admin/reviews`, `PATCH /api/admin/reviews/:id/status`,
///   `DELETE /api/admin/reviews/:id`
/// - `POST /api/admin/pages`, `PUT|DELETE /api/admin/pages/:id`
/// - `PATCH /api/admin/settings`
pub(super) fn routes<P: ConnectionProvider>() -> Router<SharedService<P>> {
    Router::new()
        .route("/api/admin/login", post(login::<P>))
        .route("/api/admin/logout", post(logout::<P>))
        .route("/api/admin/data", get(admin_data::<P>))
        .route("/api/admin/diagnostics", get(diagnostics::<P>))
        .route("/api/admin/products", post(create_product::<P>))
        .route(
            "/api/admin/products/:id",
            patch(update_product::<P>).delete(delete_product::<P>),
        )
        .route("/api/admin/categories", post(create_category::<P>))
        .route(
            "/api/admin/categories/:id",
            patch(update_category::<P>).delete(delete_category::<P>),
        )
        .route("/api/admin/orders", get(list_orders::<P>))
        .route("/api/admin/orders/:id/status", patch(update_order_status::<P>))
        .route(
            "/api/admin/orders/:id",
            axum::routing::delete(delete_order::<P>),
        )
        .route(
            "/api/admin/promotions",
            get(list_promotions::<P>).post(create_promotion::<P>),
        )
        .route(
            "/api/admin/promotions/:id",
            patch(update_promotion::<P>).delete(delete_promotion::<P>),
        )
        .route(
            "/api/admin/promotions/:id/active",
            post(set_promotion_active::<P>),
        )
        .route("/api/admin/messages", get(list_messages::<P>))
        .route("/api/admin/messages/:id/read", post(mark_message_read::<P>))
        .route(
            "/api/admin/messages/:id",
            axum::routing::delete(delete_message::<P>),
        )
        .route("/api/admin/reviews", get(list_reviews::<P>))
        .route(
            "/api/admin/reviews/:id/status",
            patch(update_review_status::<P>),
        )
        .route(
            "/api/admin/reviews/:id",
            axum::routing::delete(delete_review::<P>),
        )
        .route("/api/admin/pages", post(create_page::<P>))
        .route(
            "/api/admin/pages/:id",
            axum::routing::put(update_page::<P>).delete(delete_page::<P>),
        )
        .route("/api/admin/settings", patch(update_settings::<P>))
}

#[derive(Deserialize)]
struct LoginRequest {
    password: String,
}

async fn login<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let cookie = service.login(&request.password).await?;
    Ok((
        [(SET_COOKIE, cookie.to_string())],
        Json(json!({ "success": true })),
    ))
}

async fn logout<P: ConnectionProvider>(State(service): State<SharedService<P>>) -> impl IntoResponse {
    let cookie = service.logout();
    ([(SET_COOKIE, cookie.to_string())], StatusCode::NO_CONTENT)
}

async fn admin_data<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
) -> ApiResult<Json<Document>> {
    Ok(Json(service.get_admin_data(session_token(&headers)).await?))
}

async fn diagnostics<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
) -> ApiResult<Json<Diagnostics>> {
    Ok(Json(service.diagnostics(session_token(&headers)).await?))
}

// Products

async fn create_product<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Json(input): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = service.create_product(session_token(&headers), input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<ProductPatch>,
) -> ApiResult<Json<Product>> {
    Ok(Json(
        service
            .update_product(session_token(&headers), id, input)
            .await?,
    ))
}

async fn delete_product<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    service.delete_product(session_token(&headers), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Categories

async fn create_category<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Json(input): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = service.create_category(session_token(&headers), input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<CategoryPatch>,
) -> ApiResult<Json<Category>> {
    Ok(Json(
        service
            .update_category(session_token(&headers), &id, input)
            .await?,
    ))
}

async fn delete_category<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    service.delete_category(session_token(&headers), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Orders

async fn list_orders<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(service.list_orders(session_token(&headers)).await?))
}

#[derive(Deserialize)]
struct OrderStatusRequest {
    status: OrderStatus,
}

async fn update_order_status<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<OrderStatusRequest>,
) -> ApiResult<Json<Order>> {
    Ok(Json(
        service
            .update_order_status(session_token(&headers), &id, request.status)
            .await?,
    ))
}

async fn delete_order<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    service.delete_order(session_token(&headers), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Promotions

async fn list_promotions<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Promotion>>> {
    Ok(Json(service.list_promotions(session_token(&headers)).await?))
}

async fn create_promotion<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Json(input): Json<NewPromotion>,
) -> ApiResult<(StatusCode, Json<Promotion>)> {
    let promotion = service
        .create_promotion(session_token(&headers), input)
        .await?;
    Ok((StatusCode::CREATED, Json(promotion)))
}

async fn update_promotion<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<PromotionPatch>,
) -> ApiResult<Json<Promotion>> {
    Ok(Json(
        service
            .update_promotion(session_token(&headers), &id, input)
            .await?,
    ))
}

#[derive(Deserialize)]
struct ActiveRequest {
    active: bool,
}

async fn set_promotion_active<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<ActiveRequest>,
) -> ApiResult<Json<Promotion>> {
    Ok(Json(
        service
            .set_promotion_active(session_token(&headers), &id, request.active)
            .await?,
    ))
}

async fn delete_promotion<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    service.delete_promotion(session_token(&headers), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Messages

async fn list_messages<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Message>>> {
    Ok(Json(service.list_messages(session_token(&headers)).await?))
}

async fn mark_message_read<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    Ok(Json(
        service
            .mark_message_read(session_token(&headers), &id)
            .await?,
    ))
}

async fn delete_message<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    service.delete_message(session_token(&headers), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Reviews

async fn list_reviews<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Review>>> {
    Ok(Json(service.list_reviews(session_token(&headers)).await?))
}

#[derive(Deserialize)]
struct ReviewStatusRequest {
    status: ReviewStatus,
}

async fn update_review_status<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<ReviewStatusRequest>,
) -> ApiResult<Json<Review>> {
    Ok(Json(
        service
            .update_review_status(session_token(&headers), &id, request.status)
            .await?,
    ))
}

async fn delete_review<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    service.delete_review(session_token(&headers), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Pages

async fn create_page<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Json(input): Json<NewPage>,
) -> ApiResult<(StatusCode, Json<Page>)> {
    let page = service.create_page(session_token(&headers), input).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

async fn update_page<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<PagePatch>,
) -> ApiResult<Json<Page>> {
    Ok(Json(
        service
            .update_page(session_token(&headers), &id, input)
            .await?,
    ))
}

async fn delete_page<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    service.delete_page(session_token(&headers), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Settings

async fn update_settings<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    headers: HeaderMap,
    Json(input): Json<SettingsPatch>,
) -> ApiResult<Json<Settings>> {
    Ok(Json(
        service
            .update_settings(session_token(&headers), input)
            .await?,
    ))
}
