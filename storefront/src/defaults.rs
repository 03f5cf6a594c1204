//! Compiled-in seed data.
//!
//! This is what a fresh store starts with, what reads fall back to when the
//! database is unreachable, and where the migrator takes its backfill values
//! from.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::{
    BankDetails, Category, CustomOrderOptions, Document, Location, Page, Product, Settings,
    Showcase, SocialLinks,
};

/// Timestamp stamped on seed pages. Fixed so the default document is
/// deterministic.
pub const SEED_TIMESTAMP: &str = "2024-01-01T00:00:00.000Z";

pub fn document() -> Document {
    Document {
        products: products(),
        categories: categories(),
        settings: settings(),
        orders: Vec::new(),
        promotions: Vec::new(),
        messages: Vec::new(),
        reviews: Vec::new(),
        pages: pages(),
        extra: Map::new(),
    }
}

pub fn products() -> Vec<Product> {
    let seed = [
        (1, "Classic Chocolate Fudge", "Rich, decadent layers of velvety Belgian chocolate ganache.", 3500.0, "Chocolate", true),
        (2, "Vanilla Bean Dream", "Light vanilla sponge infused with Madagascar vanilla beans.", 3000.0, "Vanilla", false),
        (3, "Red Velvet Royale", "Southern-style red velvet with a cloud of cream cheese frosting.", 4200.0, "Signature", true),
        (4, "Tropical Mango Burst", "Fresh mango layers with passion fruit glaze and coconut cream.", 3800.0, "Fruit", false),
        (5, "Butterscotch Bliss", "Silky butterscotch sponge with caramel drizzle and toffee bits.", 3200.0, "Signature", false),
        (6, "Strawberry Delight", "Fluffy sponge layered with fresh strawberries and Chantilly cream.", 3600.0, "Fruit", true),
    ];

    seed.into_iter()
        .map(|(id, name, description, price, category, is_featured)| Product {
            id,
            name: name.to_string(),
            description: description.to_string(),
            price,
            category: category.to_string(),
            categories: Some(vec![category.to_string()]),
            variants: None,
            flavors: None,
            image_url: String::new(),
            is_featured,
            created_at: None,
            extra: Map::new(),
        })
        .collect()
}

pub fn categories() -> Vec<Category> {
    ["Chocolate", "Vanilla", "Fruit", "Signature", "Custom"]
        .into_iter()
        .enumerate()
        .map(|(i, name)| Category {
            id: (i + 1).to_string(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            description: None,
        })
        .collect()
}

pub fn settings() -> Settings {
    Settings {
        store_name: "Santhul Cake House".to_string(),
        primary_color: None,
        locations: vec![Location {
            id: "1".to_string(),
            name: "Main Branch".to_string(),
            address: "123 Cake Lane, Sweet City".to_string(),
            phone: "+94 77 123 4567".to_string(),
            google_maps_url: None,
        }],
        address: "123 Cake Lane, Sweet City".to_string(),
        phone: "+94 77 123 4567".to_string(),
        email: "hello@santhulcakes.com".to_string(),
        social_links: SocialLinks {
            facebook: "https://facebook.com".to_string(),
            instagram: "https://instagram.com".to_string(),
            whatsapp: None,
            tiktok: None,
        },
        footer_text: "Crafting sweet memories with homemade love.".to_string(),
        serving_cities: serving_cities(),
        bank_details: BankDetails::default(),
        custom_order: CustomOrderOptions::default(),
        showcase: Showcase::default(),
        image_library: Vec::new(),
        extra: Map::new(),
    }
}

pub fn custom_order_flavors() -> Vec<String> {
    ["Vanilla", "Chocolate", "Coffee", "Fruit Gateau", "Black Forest"]
        .map(String::from)
        .to_vec()
}

pub fn custom_order_sizes() -> Vec<String> {
    ["1 kg (Serves 6-8)", "2 kg (Serves 12-16)", "3 kg (Serves 20+)"]
        .map(String::from)
        .to_vec()
}

pub fn serving_cities() -> Vec<String> {
    ["Colombo", "Dehiwala", "Mount Lavinia"]
        .map(String::from)
        .to_vec()
}

pub fn pages() -> Vec<Page> {
    let seed = [
        ("1", "terms", "Terms & Conditions", "Welcome to Santhul Cake House..."),
        ("2", "privacy", "Privacy Policy", "Your privacy is important to us..."),
        ("3", "cookie-policy", "Cookie Policy", "We use cookies to improve your experience..."),
        ("4", "faq", "Frequently Asked Questions", "Q: do you deliver?\nA: Yes..."),
    ];

    seed.into_iter()
        .map(|(id, slug, title, content)| Page {
            id: id.to_string(),
            slug: slug.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            last_updated: SEED_TIMESTAMP.to_string(),
        })
        .collect()
}

/// JSON form of a seed value, for backfilling untyped documents.
pub(crate) fn to_json<T: Serialize>(value: T) -> Value {
    // Plain data with string keys; serialization cannot fail.
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ids_unique() {
        let products = products();
        let mut ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), products.len());

        let categories = categories();
        assert_eq!(categories[0].slug, "chocolate");
        assert_eq!(categories[4].id, "5");
    }

    #[test]
    fn test_seed_settings_shape() {
        let settings = settings();
        assert_eq!(settings.custom_order.flavors.len(), 5);
        assert_eq!(settings.custom_order.sizes.len(), 3);
        assert_eq!(settings.bank_details.bank, "");
        assert_eq!(settings.serving_cities, serving_cities());
    }

    #[test]
    fn test_seed_is_deterministic() {
        assert_eq!(document(), document());
    }

    #[test]
    fn test_to_json_serializes_seed_values() {
        let value = to_json(BankDetails::default());
        assert_eq!(value["accountNumber"], Value::String(String::new()));
    }
}
