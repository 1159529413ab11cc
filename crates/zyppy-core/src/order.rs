//! Order domain models.
//!
//! Orders are created once through [`OrderRequest`] and afterwards owned by
//! the backend; this client only reads them back. Reviews ride along here
//! because they always reference an order.

use crate::cart::Cart;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle of an order as reported by the backend.
///
/// The client never changes a status; it only renders whatever the backend
/// reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OnWay,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Human-readable form for screens.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Order placed",
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Being prepared",
            Self::OnWay => "On the way",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// One ordered item as it appears on the order wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub food_item_id: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Request body for creating an order.
///
/// The backend recomputes prices from its own menu data and adds the
/// delivery fee, so the request carries quantities only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub user_id: String,
    pub restaurant_id: String,
    pub items: Vec<OrderItem>,
    pub delivery_address: String,
}

impl OrderRequest {
    /// Builds the request for the current cart contents.
    ///
    /// Callers are expected to have validated the cart first; an empty cart
    /// produces an empty `items` list and no restaurant id.
    pub fn from_cart(cart: &Cart, user_id: &str, delivery_address: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            restaurant_id: cart.restaurant_id().unwrap_or_default().to_string(),
            items: cart
                .lines()
                .iter()
                .map(|line| OrderItem {
                    food_item_id: line.food_item_id.clone(),
                    quantity: line.quantity,
                    special_instructions: None,
                })
                .collect(),
            delivery_address: delivery_address.to_string(),
        }
    }
}

/// An order as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub restaurant_id: String,
    pub items: Vec<OrderItem>,
    /// Item subtotals plus the restaurant's delivery fee, computed
    /// server-side
    pub total_amount: f64,
    pub delivery_address: String,
    pub status: OrderStatus,
    /// ISO 8601 timestamp
    pub created_at: String,
    /// ISO 8601 timestamp of the promised delivery
    #[serde(default)]
    pub estimated_delivery: Option<String>,
    /// Payment session attached once checkout was started
    #[serde(default)]
    pub payment_session_id: Option<String>,
}

/// A restaurant review left after an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub restaurant_id: String,
    pub order_id: String,
    /// 1 to 5 stars
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: String,
}

/// Request body for posting a review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub user_id: String,
    pub restaurant_id: String,
    pub order_id: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MenuItem;
    use std::str::FromStr;

    #[test]
    fn test_status_wire_names() {
        let parsed: OrderStatus = serde_json::from_str("\"on_way\"").unwrap();
        assert_eq!(parsed, OrderStatus::OnWay);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"on_way\"");
        assert_eq!(OrderStatus::from_str("on_way").unwrap(), OrderStatus::OnWay);
        assert_eq!(OrderStatus::OnWay.to_string(), "on_way");
    }

    #[test]
    fn test_order_request_mirrors_cart() {
        let mut cart = Cart::new();
        cart.add_item(
            &MenuItem {
                id: "f1".to_string(),
                restaurant_id: "r1".to_string(),
                name: "Margherita".to_string(),
                description: String::new(),
                price: 12.99,
                category: "Pizza".to_string(),
                image_url: String::new(),
                is_vegetarian: true,
                is_available: true,
            },
            2,
        );

        let request = OrderRequest::from_cart(&cart, "u1", "42 Foo St");

        assert_eq!(request.user_id, "u1");
        assert_eq!(request.restaurant_id, "r1");
        assert_eq!(request.delivery_address, "42 Foo St");
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].food_item_id, "f1");
        assert_eq!(request.items[0].quantity, 2);
    }

    #[test]
    fn test_order_item_omits_empty_instructions() {
        let item = OrderItem {
            food_item_id: "f1".to_string(),
            quantity: 1,
            special_instructions: None,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("special_instructions"));
    }
}
