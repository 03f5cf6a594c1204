use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use storefront::{
    Category, ConnectionProvider, CouponResult, Message, NewMessage, NewOrder, NewReview, Order,
    Page, Product, PublicData, Review, Settings,
};

use super::{ApiResult, SharedService};

pub(super) fn routes<P: ConnectionProvider>() -> Router<SharedService<P>> {
    Router::new()
        .route("/api/public", get(public_data::<P>))
        .route("/api/products", get(list_products::<P>))
        .route("/api/products/:id", get(get_product::<P>))
        .route("/api/products/:id/reviews", get(product_reviews::<P>))
        .route("/api/categories", get(list_categories::<P>))
        .route("/api/settings", get(get_settings::<P>))
        .route("/api/pages", get(list_pages::<P>))
        .route("/api/pages/:slug", get(get_page::<P>))
        .route("/api/coupons/validate", post(validate_coupon::<P>))
        .route("/api/orders", post(create_order::<P>))
        .route("/api/messages", post(create_message::<P>))
        .route("/api/reviews", post(add_review::<P>))
}

async fn public_data<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
) -> Json<PublicData> {
    Json(service.get_public_data().await)
}

async fn list_products<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
) -> Json<Vec<Product>> {
    Json(service.list_products().await)
}

async fn get_product<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Product>> {
    Ok(Json(service.get_product(id).await?))
}

async fn product_reviews<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    Path(id): Path<i64>,
) -> Json<Vec<Review>> {
    Json(service.list_product_reviews(id).await)
}

async fn list_categories<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
) -> Json<Vec<Category>> {
    Json(service.list_categories().await)
}

async fn get_settings<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
) -> Json<Settings> {
    Json(service.get_settings().await)
}

async fn list_pages<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
) -> Json<Vec<Page>> {
    Json(service.list_pages().await)
}

async fn get_page<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Page>> {
    Ok(Json(service.get_page(&slug).await?))
}

#[derive(Deserialize)]
struct CouponRequest {
    code: String,
    subtotal: f64,
}

async fn validate_coupon<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    Json(request): Json<CouponRequest>,
) -> Json<CouponResult> {
    Json(service.validate_coupon(&request.code, request.subtotal).await)
}

async fn create_order<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    Json(order): Json<NewOrder>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    Ok((StatusCode::CREATED, Json(service.create_order(order).await?)))
}

async fn create_message<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    Json(message): Json<NewMessage>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    Ok((
        StatusCode::CREATED,
        Json(service.create_message(message).await?),
    ))
}

async fn add_review<P: ConnectionProvider>(
    State(service): State<SharedService<P>>,
    Json(review): Json<NewReview>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    Ok((StatusCode::CREATED, Json(service.add_review(review).await?)))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seeded, send};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_public_data_shape() {
        let (app, _, _) = seeded();
        let (status, _, body) = send(&app, "GET", "/api/public", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["products"].as_array().unwrap().len(), 6);
        assert_eq!(body["categories"].as_array().unwrap().len(), 5);
        assert!(body["promotions"].as_array().unwrap().is_empty());
        assert!(body["settings"]["storeName"].is_string());
        assert!(body.get("orders").is_none());
    }

    #[tokio::test]
    async fn test_product_lookup() {
        let (app, _, _) = seeded();

        let (status, _, body) = send(&app, "GET", "/api/products/3", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 3);

        let (status, _, body) = send(&app, "GET", "/api/products/99", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("product"));
    }

    #[tokio::test]
    async fn test_pages_by_slug() {
        let (app, _, _) = seeded();
        let (status, _, body) = send(&app, "GET", "/api/pages/privacy", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "privacy");

        let (status, _, _) = send(&app, "GET", "/api/pages/nope", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_checkout_flow() {
        let (app, backend, _) = seeded();

        let (status, _, body) = send(
            &app,
            "POST",
            "/api/orders",
            None,
            Some(json!({
                "customer_name": "Ayesha",
                "customer_phone": "0770000000",
                "shipping_address": "1 Park Street",
                "city": "Colombo",
                "items": [{ "id": 1, "name": "Classic Chocolate Fudge", "price": 3500, "quantity": 1 }],
                "total_amount": 3500,
                "delivery_date": "2024-08-01"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].as_str().unwrap().starts_with("ORD-"));
        assert_eq!(body["status"], "Pending");
        assert_eq!(body["type"], "Standard");
        assert_eq!(backend.row().unwrap()["orders"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_order_is_bad_request() {
        let (app, _, _) = seeded();
        let (status, _, body) = send(
            &app,
            "POST",
            "/api/orders",
            None,
            Some(json!({
                "customer_name": "Ayesha",
                "customer_phone": "0770000000",
                "city": "Jaffna",
                "total_amount": 3500
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_coupon_without_promotions() {
        let (app, _, _) = seeded();
        let (status, _, body) = send(
            &app,
            "POST",
            "/api/coupons/validate",
            None,
            Some(json!({ "code": "SAVE10", "subtotal": 10000 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "valid": false, "discount": 0.0 }));
    }

    #[tokio::test]
    async fn test_review_submission_is_pending() {
        let (app, _, _) = seeded();
        let (status, _, body) = send(
            &app,
            "POST",
            "/api/reviews",
            None,
            Some(json!({ "productId": 2, "userName": "Priya", "rating": 5, "comment": "Yum" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "pending");

        let (_, _, reviews) = send(&app, "GET", "/api/products/2/reviews", None, None).await;
        assert_eq!(reviews, json!([]));
    }

    #[tokio::test]
    async fn test_contact_message() {
        let (app, _, _) = seeded();
        let (status, _, body) = send(
            &app,
            "POST",
            "/api/messages",
            None,
            Some(json!({
                "name": "Kamal",
                "phone": "0711111111",
                "subject": "Custom Cake Request",
                "message": "Dinosaur theme",
                "type": "CustomOrder",
                "flavor": "Chocolate",
                "weight": "2 kg (Serves 12-16)"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["read"], false);
        assert!(body["id"].is_i64());
    }
}
