//! End-to-end flows across the façade, store and migrator.

use std::time::Duration;

use serde_json::json;

use super::test_support::{seeded_service, service_with, SECRET};
use super::*;
use crate::auth::SessionAuthenticator;
use crate::model::{
    DiscountType, NewOrder, NewProduct, NewPromotion, OrderKind, OrderStatus, ProductPatch,
};
use crate::persistence::{InMemoryBackend, InMemoryProvider};

fn checkout(name: &str) -> NewOrder {
    NewOrder {
        customer_name: name.to_string(),
        customer_phone: "0712345678".to_string(),
        customer_email: Some("guest@example.com".to_string()),
        shipping_address: "5 Marine Drive".to_string(),
        city: "Mount Lavinia".to_string(),
        items: Vec::new(),
        total_amount: 3500.0,
        status: OrderStatus::Pending,
        kind: OrderKind::Custom,
        delivery_date: "2024-07-01".to_string(),
        notes: Some("Happy birthday".to_string()),
    }
}

#[tokio::test]
async fn test_order_lifecycle() {
    let (service, _, token) = seeded_service();

    let order = service.create_order(checkout("Ruwan")).await.unwrap();
    let other = service.create_order(checkout("Nadeesha")).await.unwrap();
    assert_ne!(order.id, other.id);
    let id = order.id.to_string();

    for status in [OrderStatus::Confirmed, OrderStatus::Completed] {
        let updated = service
            .update_order_status(Some(&token), &id, status)
            .await
            .unwrap();
        assert_eq!(updated.status, status);
    }

    let admin = service.get_admin_data(Some(&token)).await.unwrap();
    assert_eq!(admin.orders.len(), 2);
    let stored = admin.orders.iter().find(|o| o.id == order.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Completed);
    assert_eq!(stored.notes.as_deref(), Some("Happy birthday"));
    let untouched = admin.orders.iter().find(|o| o.id == other.id).unwrap();
    assert_eq!(untouched, &other);

    service.delete_order(Some(&token), &id).await.unwrap();
    assert_eq!(service.list_orders(Some(&token)).await.unwrap(), vec![other]);
}

#[tokio::test]
async fn test_unreadable_document_is_never_overwritten() {
    let raw = json!({
        "orders": [{
            "id": "ORD-000042",
            "customer_name": "Existing",
            "customer_phone": "0700000000",
            "total_amount": 2500
        }],
        "reviews": [{ "id": "r1", "productId": 1, "userName": "Priya", "rating": 4.5 }]
    });
    let backend = InMemoryBackend::with_row(raw.clone());
    let (service, token) = {
        let service = service_with(&backend, AdminCredential::Disabled);
        let token = service.sessions().create_session().value;
        (service, token)
    };

    assert!(matches!(
        service.create_order(checkout("Ruwan")).await,
        Err(StoreError::Persistence(_))
    ));
    assert!(matches!(
        service.delete_product(Some(&token), 1).await,
        Err(StoreError::Persistence(_))
    ));

    // Public reads still render the seed data.
    assert_eq!(service.list_products().await.len(), 6);
    assert_eq!(backend.row(), Some(raw));
    assert_eq!(backend.write_count(), 0);
}

#[tokio::test]
async fn test_empty_document_is_migrated_on_first_read() {
    let backend = InMemoryBackend::with_row(json!({}));
    let service = service_with(&backend, AdminCredential::Disabled);

    let public = service.get_public_data().await;
    assert_eq!(public.products.len(), 6);
    assert_eq!(public.categories.len(), 5);
    assert!(public.promotions.is_empty());

    for _ in 0..500 {
        if service.store().writer_stats().persisted == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    let stored = backend.row().unwrap();
    for field in [
        "products",
        "categories",
        "settings",
        "orders",
        "promotions",
        "messages",
        "reviews",
        "pages",
    ] {
        assert!(stored.get(field).is_some(), "{} not persisted", field);
    }
    assert!(stored["settings"]["bankDetails"].is_object());
    assert!(stored["settings"]["customOrder"]["sizes"].is_array());
}

#[tokio::test]
async fn test_reads_fall_back_to_defaults() {
    let backend = InMemoryBackend::new();
    backend.fail_reads(true);
    let service = service_with(&backend, AdminCredential::Disabled);

    assert_eq!(service.get_settings().await, Document::default().settings);
    assert_eq!(service.list_products().await, Document::default().products);

    let unconfigured = StoreService::new(
        DocumentStore::new(InMemoryProvider::unavailable()),
        SessionAuthenticator::new(SECRET, false).unwrap(),
        AdminCredential::Disabled,
    );
    assert_eq!(unconfigured.list_pages().await, Document::default().pages);
}

#[tokio::test]
async fn test_mutations_without_backend_are_not_persisted() {
    let sessions = SessionAuthenticator::new(SECRET, false).unwrap();
    let token = sessions.create_session().value;
    let service = StoreService::new(
        DocumentStore::new(InMemoryProvider::unavailable()),
        sessions,
        AdminCredential::Disabled,
    );

    service.delete_product(Some(&token), 1).await.unwrap();
    assert_eq!(service.list_products().await.len(), 6);
}

#[tokio::test]
async fn test_coupon_math() {
    let (service, _, token) = seeded_service();
    let percent = service
        .create_promotion(
            Some(&token),
            NewPromotion {
                code: "SAVE10".to_string(),
                discount_type: DiscountType::Percentage,
                value: 10.0,
                description: String::new(),
                is_active: true,
            },
        )
        .await
        .unwrap();
    service
        .create_promotion(
            Some(&token),
            NewPromotion {
                code: "FLAT500".to_string(),
                discount_type: DiscountType::Fixed,
                value: 500.0,
                description: String::new(),
                is_active: true,
            },
        )
        .await
        .unwrap();

    let applied = service.validate_coupon(" save10 ", 10000.0).await;
    assert!(applied.valid);
    assert_eq!(applied.discount, 1000.0);
    assert_eq!(applied.code.as_deref(), Some("SAVE10"));

    let fixed = service.validate_coupon("FLAT500", 10000.0).await;
    assert_eq!(fixed.discount, 500.0);

    service
        .set_promotion_active(Some(&token), &percent.id, false)
        .await
        .unwrap();
    let inactive = service.validate_coupon("SAVE10", 10000.0).await;
    assert!(!inactive.valid);
    assert_eq!(inactive.discount, 0.0);
    assert!(inactive.code.is_none());

    assert!(!service.validate_coupon("UNKNOWN", 10000.0).await.valid);
}

#[tokio::test]
async fn test_unauthorized_admin_ops_never_touch_the_store() {
    let (service, backend, token) = seeded_service();
    let reads = backend.read_count();

    let last = if token.ends_with('0') { '1' } else { '0' };
    let forged = format!("{}{}", &token[..token.len() - 1], last);
    let other_secret = SessionAuthenticator::new(b"rotated-secret", false)
        .unwrap()
        .create_session()
        .value;

    for session in [None, Some("garbage"), Some(forged.as_str()), Some(other_secret.as_str())] {
        assert!(matches!(
            service.delete_product(session, 1).await,
            Err(StoreError::Unauthorized)
        ));
        assert!(matches!(
            service
                .update_product(session, 1, ProductPatch::default())
                .await,
            Err(StoreError::Unauthorized)
        ));
        assert!(matches!(
            service.get_admin_data(session).await,
            Err(StoreError::Unauthorized)
        ));
        assert!(matches!(
            service.list_orders(session).await,
            Err(StoreError::Unauthorized)
        ));
    }

    assert_eq!(backend.read_count(), reads);
    assert_eq!(backend.write_count(), 0);
}

#[tokio::test]
async fn test_admin_edit_roundtrips_through_storage() {
    let (service, backend, token) = seeded_service();

    let created = service
        .create_product(
            Some(&token),
            NewProduct {
                name: "Pistachio Rose".to_string(),
                description: "Rose sponge, pistachio cream.".to_string(),
                price: 4800.0,
                category: "Signature".to_string(),
                categories: Some(vec!["Signature".to_string(), "Custom".to_string()]),
                variants: None,
                flavors: None,
                image_url: String::new(),
                is_featured: true,
            },
        )
        .await
        .unwrap();

    let stored: Document = serde_json::from_value(backend.row().unwrap()).unwrap();
    assert_eq!(stored.products.last(), Some(&created));
    assert_eq!(service.get_admin_data(Some(&token)).await.unwrap(), stored);
}
