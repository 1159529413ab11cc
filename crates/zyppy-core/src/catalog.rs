//! Catalog domain models.
//!
//! Read-only wire models for restaurant discovery and menu browsing.
//! Field names follow the backend's JSON shapes exactly; the client never
//! mutates these records.

use serde::{Deserialize, Serialize};

/// A restaurant as listed by the discovery endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    /// Cuisine label used by the list filter ("Italian", "Japanese", ...)
    pub cuisine_type: String,
    #[serde(default)]
    pub rating: f64,
    /// Human-readable estimate, e.g. "30-45 min"
    #[serde(default)]
    pub delivery_time: String,
    /// Flat fee the backend adds to the order total
    #[serde(default)]
    pub delivery_fee: f64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
}

/// A dish on a restaurant's menu.
///
/// `restaurant_id` ties the item back to its restaurant; the cart engine
/// relies on it for the single-restaurant rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Menu section, e.g. "Pizza" or "Dessert"; the menu endpoint can
    /// filter on it server-side
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub is_vegetarian: bool,
    /// The menu endpoint only returns available items, but the flag is kept
    /// so other item sources can be filtered the same way
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}
