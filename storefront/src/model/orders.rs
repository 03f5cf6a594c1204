use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    #[default]
    Standard,
    Custom,
}

/// Snapshot of a cart line at checkout time: the product as it was, plus the
/// options the customer chose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_flavor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Product fields copied into the line (`id`, `name`, `price`, ...).
    #[serde(flatten)]
    pub product: Map<String, Value>,
}

impl OrderItem {
    /// Price per unit: the chosen variant/flavor price when present, else the
    /// product's base price.
    pub fn unit_price(&self) -> f64 {
        self.selected_price
            .or_else(|| self.product.get("price").and_then(Value::as_f64))
            .unwrap_or(0.0)
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price() * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: EntityId,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(rename = "type", default)]
    pub kind: OrderKind,
    /// ISO-8601 timestamp of when the order was placed.
    #[serde(default)]
    pub date: String,
    /// Requested delivery date as entered by the customer.
    #[serde(default)]
    pub delivery_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Order as submitted from checkout or the admin "new order" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(rename = "type", default)]
    pub kind: OrderKind,
    #[serde(default)]
    pub delivery_date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewOrder {
    pub fn into_order(self, id: EntityId, date: String) -> Order {
        Order {
            id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            customer_email: self.customer_email,
            shipping_address: self.shipping_address,
            city: self.city,
            items: self.items,
            total_amount: self.total_amount,
            status: self.status,
            kind: self.kind,
            date,
            delivery_date: self.delivery_date,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: String,
    pub code: String,
    pub discount_type: DiscountType,
    pub value: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
}

impl Promotion {
    /// Discount this promotion grants on `subtotal`.
    pub fn discount_for(&self, subtotal: f64) -> f64 {
        match self.discount_type {
            DiscountType::Percentage => subtotal * self.value / 100.0,
            DiscountType::Fixed => self.value,
        }
    }

    /// Case-insensitive code comparison, ignoring surrounding whitespace in
    /// the submitted code.
    pub fn code_matches(&self, code: &str) -> bool {
        self.code.to_lowercase() == code.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPromotion {
    pub code: String,
    pub discount_type: DiscountType,
    pub value: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
}

impl NewPromotion {
    pub fn into_promotion(self, id: String) -> Promotion {
        Promotion {
            id,
            code: self.code,
            discount_type: self.discount_type,
            value: self.value,
            description: self.description,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionPatch {
    pub code: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub value: Option<f64>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl PromotionPatch {
    pub fn apply(self, promotion: &mut Promotion) {
        if let Some(code) = self.code {
            promotion.code = code;
        }
        if let Some(discount_type) = self.discount_type {
            promotion.discount_type = discount_type;
        }
        if let Some(value) = self.value {
            promotion.value = value;
        }
        if let Some(description) = self.description {
            promotion.description = description;
        }
        if let Some(is_active) = self.is_active {
            promotion.is_active = is_active;
        }
    }
}

/// Outcome of checking a coupon code against a cart subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponResult {
    pub valid: bool,
    pub discount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl CouponResult {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            discount: 0.0,
            code: None,
            discount_type: None,
            value: None,
        }
    }

    pub fn applied(promotion: &Promotion, subtotal: f64) -> Self {
        Self {
            valid: true,
            discount: promotion.discount_for(subtotal),
            code: Some(promotion.code.clone()),
            discount_type: Some(promotion.discount_type),
            value: Some(promotion.value),
        }
    }
}
