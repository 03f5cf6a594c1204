use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A size/weight option with its own price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub name: String,
    pub price: f64,
}

/// A flavor option; `price` is the extra cost on top of the base price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFlavor {
    pub name: String,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Base price.
    pub price: f64,
    /// Primary category, kept alongside `categories` for older clients.
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<ProductVariant>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavors: Option<Vec<ProductFlavor>>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// True if the product is listed under `category`, either as its primary
    /// category or in the multi-category list.
    pub fn in_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
            || self
                .categories
                .iter()
                .flatten()
                .any(|c| c.eq_ignore_ascii_case(category))
    }
}

/// Input for creating a product. The id and creation timestamp are assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub variants: Option<Vec<ProductVariant>>,
    #[serde(default)]
    pub flavors: Option<Vec<ProductFlavor>>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub is_featured: bool,
}

impl NewProduct {
    pub fn into_product(self, id: i64, created_at: String) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            categories: self.categories,
            variants: self.variants,
            flavors: self.flavors,
            image_url: self.image_url,
            is_featured: self.is_featured,
            created_at: Some(created_at),
            extra: Map::new(),
        }
    }
}

/// Partial product update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub categories: Option<Vec<String>>,
    pub variants: Option<Vec<ProductVariant>>,
    pub flavors: Option<Vec<ProductFlavor>>,
    pub image_url: Option<String>,
    pub is_featured: Option<bool>,
}

impl ProductPatch {
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if self.categories.is_some() {
            product.categories = self.categories;
        }
        if self.variants.is_some() {
            product.variants = self.variants;
        }
        if self.flavors.is_some() {
            product.flavors = self.flavors;
        }
        if let Some(image_url) = self.image_url {
            product.image_url = image_url;
        }
        if let Some(is_featured) = self.is_featured {
            product.is_featured = is_featured;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

impl CategoryPatch {
    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(slug) = self.slug {
            category.slug = slug;
        }
        if self.description.is_some() {
            category.description = self.description;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cake() -> Product {
        serde_json::from_value(json!({
            "id": 3,
            "name": "Red Velvet Royale",
            "description": "Southern-style red velvet.",
            "price": 4200,
            "category": "Signature",
            "categories": ["Signature", "Chocolate"],
            "image_url": "",
            "is_featured": true
        }))
        .unwrap()
    }

    #[test]
    fn test_product_keeps_unknown_fields() {
        let raw = json!({
            "id": 1,
            "name": "Fudge",
            "price": 3500,
            "legacy_sku": "FDG-1"
        });
        let product: Product = serde_json::from_value(raw).unwrap();
        assert_eq!(product.extra.get("legacy_sku"), Some(&json!("FDG-1")));
        assert_eq!(product.description, "");

        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back["legacy_sku"], json!("FDG-1"));
        assert!(back.get("variants").is_none());
    }

    #[test]
    fn test_in_category_checks_both_fields() {
        let product = cake();
        assert!(product.in_category("signature"));
        assert!(product.in_category("Chocolate"));
        assert!(!product.in_category("Fruit"));
    }

    #[test]
    fn test_product_patch_only_touches_present_fields() {
        let mut product = cake();
        ProductPatch {
            price: Some(4500.0),
            is_featured: Some(false),
            ..Default::default()
        }
        .apply(&mut product);

        assert_eq!(product.price, 4500.0);
        assert!(!product.is_featured);
        assert_eq!(product.name, "Red Velvet Royale");
        assert_eq!(product.categories.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_category_patch() {
        let mut category = Category {
            id: "1".into(),
            name: "Chocolate".into(),
            slug: "chocolate".into(),
            description: None,
        };
        CategoryPatch {
            name: Some("Dark Chocolate".into()),
            ..Default::default()
        }
        .apply(&mut category);
        assert_eq!(category.name, "Dark Chocolate");
        assert_eq!(category.slug, "chocolate");
    }
}
