use super::{now_iso, owned, paths, require_amount, require_text, StoreError, StoreService};
use crate::model::{CouponResult, EntityId, NewOrder, Order, OrderStatus};
use crate::persistence::ConnectionProvider;

/// `ORD-` followed by the last six digits of a millisecond timestamp.
fn order_number(millis: i64) -> String {
    format!("ORD-{:06}", millis.rem_euclid(1_000_000))
}

impl<P: ConnectionProvider> StoreService<P> {
    /// Place an order. Newest orders come first.
    pub async fn create_order(&self, input: NewOrder) -> Result<Order, StoreError> {
        require_text("customer name", &input.customer_name)?;
        require_text("customer phone", &input.customer_phone)?;
        require_amount("total amount", input.total_amount)?;
        if input.items.iter().any(|item| item.quantity == 0) {
            return Err(StoreError::Invalid("item quantity must be at least 1".to_string()));
        }

        let mut document = self.store.load_for_update().await?;
        if !input.city.trim().is_empty() && !document.settings.serves_city(&input.city) {
            return Err(StoreError::Invalid(format!(
                "deliveries to {} are not available",
                input.city.trim()
            )));
        }

        let order = input.into_order(EntityId::Text(order_number(self.ids.next())), now_iso());
        document.orders.insert(0, order.clone());
        self.commit(&document, owned(&[paths::ADMIN_ORDERS])).await?;

        tracing::info!(order_id = %order.id, total = order.total_amount, "Order placed");
        Ok(order)
    }

    pub async fn list_orders(&self, session: Option<&str>) -> Result<Vec<Order>, StoreError> {
        self.authorize(session)?;
        Ok(self.store.get().await.orders)
    }

    /// `id` matches numeric and string order ids by their text form.
    pub async fn update_order_status(
        &self,
        session: Option<&str>,
        id: &str,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        self.authorize(session)?;

        let mut document = self.store.load_for_update().await?;
        let order = document
            .orders
            .iter_mut()
            .find(|o| o.id.matches(id))
            .ok_or_else(|| StoreError::not_found("order", id))?;
        order.status = status;
        let updated = order.clone();

        self.commit(&document, owned(&[paths::ADMIN_ORDERS])).await?;
        tracing::info!(order_id = %updated.id, ?status, "Order status changed");
        Ok(updated)
    }

    pub async fn delete_order(&self, session: Option<&str>, id: &str) -> Result<(), StoreError> {
        self.authorize(session)?;

        let mut document = self.store.load_for_update().await?;
        let before = document.orders.len();
        document.orders.retain(|o| !o.id.matches(id));
        if document.orders.len() == before {
            return Err(StoreError::not_found("order", id));
        }

        self.commit(&document, owned(&[paths::ADMIN_ORDERS])).await
    }

    /// Check a coupon against a subtotal. Only active promotions apply, and
    /// no promotion details are revealed for unknown codes.
    pub async fn validate_coupon(&self, code: &str, subtotal: f64) -> CouponResult {
        if code.trim().is_empty() {
            return CouponResult::invalid();
        }

        self.store
            .get()
            .await
            .promotions
            .iter()
            .find(|p| p.is_active && p.code_matches(code))
            .map(|p| CouponResult::applied(p, subtotal))
            .unwrap_or_else(CouponResult::invalid)
    }
}
