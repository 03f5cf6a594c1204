//! On-read schema migration for the store document.
//!
//! Documents written by older versions of the storefront may lack
//! collections or settings sub-objects introduced later (a freshly created
//! row may even be `{}`). [`migrate_document`] backfills every missing field
//! with its seed default before the value is converted into the typed
//! [`Document`](crate::model::Document).
//!
//! The migration is purely additive: existing fields are never removed,
//! renamed or overwritten, so running it on an already-current document is a
//! no-op. A field counts as missing when it is absent or `null`.
//!
//! Check order matters only in that `settings` must exist before its
//! children are probed; top-level collections come first.

use serde_json::{Map, Value};

use crate::defaults::{self, to_json};
use crate::model::{BankDetails, CustomOrderOptions, Showcase};

/// Result of migrating a raw document.
#[derive(Debug, Clone, PartialEq)]
pub struct Migrated {
    pub document: Value,
    /// Paths of the fields that were backfilled, in check order.
    pub backfilled: Vec<&'static str>,
}

impl Migrated {
    /// True if the migrated document differs from the input and should be
    /// written back.
    pub fn is_modified(&self) -> bool {
        !self.backfilled.is_empty()
    }
}

/// Backfill every missing field of `raw` with its default.
pub fn migrate_document(raw: Value) -> Migrated {
    let mut backfilled = Vec::new();

    let mut root = match raw {
        Value::Object(map) => map,
        _ => {
            backfilled.push("$");
            Map::new()
        }
    };

    let top_level: [(&'static str, fn() -> Value); 8] = [
        ("products", || to_json(defaults::products())),
        ("categories", || to_json(defaults::categories())),
        ("settings", || to_json(defaults::settings())),
        ("orders", empty_list),
        ("promotions", empty_list),
        ("messages", empty_list),
        ("reviews", empty_list),
        ("pages", || to_json(defaults::pages())),
    ];
    for (field, default) in top_level {
        if backfill(&mut root, field, default) {
            backfilled.push(field);
        }
    }

    if let Some(Value::Object(settings)) = root.get_mut("settings") {
        migrate_settings(settings, &mut backfilled);
    }

    Migrated {
        document: Value::Object(root),
        backfilled,
    }
}

fn migrate_settings(settings: &mut Map<String, Value>, backfilled: &mut Vec<&'static str>) {
    if backfill(settings, "bankDetails", || to_json(BankDetails::default())) {
        backfilled.push("settings.bankDetails");
    }

    if backfill(settings, "customOrder", || to_json(CustomOrderOptions::default())) {
        backfilled.push("settings.customOrder");
    }
    if let Some(Value::Object(custom_order)) = settings.get_mut("customOrder") {
        if backfill(custom_order, "sizes", || to_json(defaults::custom_order_sizes())) {
            backfilled.push("settings.customOrder.sizes");
        }
        if backfill(custom_order, "flavors", || to_json(defaults::custom_order_flavors())) {
            backfilled.push("settings.customOrder.flavors");
        }
    }

    if backfill(settings, "showcase", || to_json(Showcase::default())) {
        backfilled.push("settings.showcase");
    }
    if backfill(settings, "imageLibrary", empty_list) {
        backfilled.push("settings.imageLibrary");
    }
    if backfill(settings, "locations", empty_list) {
        backfilled.push("settings.locations");
    }
    if backfill(settings, "servingCities", || to_json(defaults::serving_cities())) {
        backfilled.push("settings.servingCities");
    }
}

/// Insert `default()` under `field` if it is absent or null. Returns true if
/// something was inserted.
fn backfill(map: &mut Map<String, Value>, field: &str, default: impl FnOnce() -> Value) -> bool {
    match map.get(field) {
        Some(value) if !value.is_null() => false,
        _ => {
            map.insert(field.to_string(), default());
            true
        }
    }
}

fn empty_list() -> Value {
    Value::Array(Vec::new())
}
