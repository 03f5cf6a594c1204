use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Category, Message, Order, Page, Product, Promotion, Review, Settings};
use crate::defaults;

/// The whole persisted store state.
///
/// Always saved as one unit; there is no partial write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub promotions: Vec<Promotion>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Document {
    /// The compiled-in seed document.
    fn default() -> Self {
        defaults::document()
    }
}

impl Document {
    pub fn counts(&self) -> CollectionCounts {
        CollectionCounts {
            products: self.products.len(),
            categories: self.categories.len(),
            orders: self.orders.len(),
            promotions: self.promotions.len(),
            messages: self.messages.len(),
            reviews: self.reviews.len(),
            pages: self.pages.len(),
        }
    }
}

/// Number of records per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionCounts {
    pub products: usize,
    pub categories: usize,
    pub orders: usize,
    pub promotions: usize,
    pub messages: usize,
    pub reviews: usize,
    pub pages: usize,
}
