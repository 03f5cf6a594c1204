//! Typed shape of the store document.
//!
//! The whole storefront state lives in one JSON value. These types are the
//! strongly-typed view of it; field names follow the stored JSON exactly,
//! which mixes `snake_case` (products, orders) and `camelCase` (everything
//! else). Unknown fields on the document, settings and products are carried
//! in `extra` maps so a typed round trip never drops data written by newer
//! or older clients.

mod catalog;
mod content;
mod document;
mod orders;
mod settings;

pub use catalog::{
    Category, CategoryPatch, NewCategory, NewProduct, Product, ProductFlavor, ProductPatch,
    ProductVariant,
};
pub use content::{
    Message, MessageKind, NewMessage, NewPage, NewReview, Page, PagePatch, Review, ReviewStatus,
};
pub use document::{CollectionCounts, Document};
pub use orders::{
    CouponResult, DiscountType, NewOrder, NewPromotion, Order, OrderItem, OrderKind, OrderStatus,
    Promotion, PromotionPatch,
};
pub use settings::{
    BankDetails, CustomOrderOptions, Location, Settings, SettingsPatch, Showcase, SocialLinks,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for records whose ids were historically written either as
/// numbers (`Date.now()` style) or as strings (`"ORD-123456"`).
///
/// Lookups compare the textual form, so `42` and `"42"` address the same
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    /// True when this id's textual form equals `other`.
    pub fn matches(&self, other: &str) -> bool {
        match self {
            EntityId::Number(n) => n.to_string() == other,
            EntityId::Text(s) => s == other,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Number(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::Text(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}
