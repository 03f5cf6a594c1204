use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::defaults;

/// A physical shop location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
}

/// Account shown to customers paying by bank transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    #[serde(default)]
    pub bank: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub branch: String,
}

/// Options offered by the custom-order wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomOrderOptions {
    #[serde(default = "defaults::custom_order_flavors")]
    pub flavors: Vec<String>,
    #[serde(default = "defaults::custom_order_sizes")]
    pub sizes: Vec<String>,
}

impl Default for CustomOrderOptions {
    fn default() -> Self {
        Self {
            flavors: defaults::custom_order_flavors(),
            sizes: defaults::custom_order_sizes(),
        }
    }
}

/// Media used on the landing and about pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Showcase {
    #[serde(default)]
    pub hero_image: String,
    #[serde(default)]
    pub about_image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub store_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub locations: Vec<Location>,
    // Legacy single-location fields, still read by older pages.
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub footer_text: String,
    /// Cities delivered to. Checkout only offers these.
    #[serde(default = "defaults::serving_cities")]
    pub serving_cities: Vec<String>,
    #[serde(default)]
    pub bank_details: BankDetails,
    #[serde(default)]
    pub custom_order: CustomOrderOptions,
    #[serde(default)]
    pub showcase: Showcase,
    #[serde(default)]
    pub image_library: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        defaults::settings()
    }
}

impl Settings {
    /// True if deliveries to `city` are accepted. An empty whitelist accepts
    /// any city.
    pub fn serves_city(&self, city: &str) -> bool {
        self.serving_cities.is_empty()
            || self
                .serving_cities
                .iter()
                .any(|c| c.trim().eq_ignore_ascii_case(city.trim()))
    }
}

/// Partial settings update; present fields replace the stored ones
/// wholesale (no deep merge of sub-objects).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub store_name: Option<String>,
    pub primary_color: Option<String>,
    pub locations: Option<Vec<Location>>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub social_links: Option<SocialLinks>,
    pub footer_text: Option<String>,
    pub serving_cities: Option<Vec<String>>,
    pub bank_details: Option<BankDetails>,
    pub custom_order: Option<CustomOrderOptions>,
    pub showcase: Option<Showcase>,
    pub image_library: Option<Vec<String>>,
}

impl SettingsPatch {
    pub fn apply(self, settings: &mut Settings) {
        if let Some(v) = self.store_name {
            settings.store_name = v;
        }
        if self.primary_color.is_some() {
            settings.primary_color = self.primary_color;
        }
        if let Some(v) = self.locations {
            settings.locations = v;
        }
        if let Some(v) = self.address {
            settings.address = v;
        }
        if let Some(v) = self.phone {
            settings.phone = v;
        }
        if let Some(v) = self.email {
            settings.email = v;
        }
        if let Some(v) = self.social_links {
            settings.social_links = v;
        }
        if let Some(v) = self.footer_text {
            settings.footer_text = v;
        }
        if let Some(v) = self.serving_cities {
            settings.serving_cities = v;
        }
        if let Some(v) = self.bank_details {
            settings.bank_details = v;
        }
        if let Some(v) = self.custom_order {
            settings.custom_order = v;
        }
        if let Some(v) = self.showcase {
            settings.showcase = v;
        }
        if let Some(v) = self.image_library {
            settings.image_library = v;
        }
    }
}
