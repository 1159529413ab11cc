//! HttpStorefrontApi - REST client for the Zyppy backend.
//!
//! One method per endpoint, each a stateless request/response exchange.
//! Non-success responses surface the backend's `detail` message inside
//! `ZyppyError::Transport`; 404s on entity lookups become `NotFound`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zyppy_core::api::StorefrontApi;
use zyppy_core::catalog::{MenuItem, Restaurant};
use zyppy_core::error::{Result, ZyppyError};
use zyppy_core::order::{Order, OrderRequest, Review, ReviewRequest};
use zyppy_core::payment::{PaymentSession, PaymentStatus};
use zyppy_core::session::Session;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// HTTP implementation of the storefront API.
#[derive(Clone)]
pub struct HttpStorefrontApi {
    client: Client,
    base_url: String,
}

impl HttpStorefrontApi {
    /// Creates a client against the given base URL (including the `/api`
    /// prefix). A trailing slash is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: serde::de::DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        read_json(response).await
    }
}

impl Default for HttpStorefrontApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn login(&self, email: &str) -> Result<Session> {
        tracing::debug!("[StorefrontApi] POST /auth/login");
        let body = LoginRequest { email };
        self.send(self.client.post(self.url("/auth/login")).json(&body))
            .await
    }

    async fn restaurants(
        &self,
        search: Option<&str>,
        cuisine: Option<&str>,
    ) -> Result<Vec<Restaurant>> {
        let mut request = self.client.get(self.url("/restaurants"));
        if let Some(search) = search {
            request = request.query(&[("search", search)]);
        }
        if let Some(cuisine) = cuisine {
            request = request.query(&[("cuisine", cuisine)]);
        }
        self.send(request).await
    }

    async fn restaurant(&self, restaurant_id: &str) -> Result<Restaurant> {
        let request = self.client.get(self.url(&format!("/restaurants/{restaurant_id}")));
        match self.send(request).await {
            Err(err) if err.http_status() == Some(404) => {
                Err(ZyppyError::not_found("restaurant", restaurant_id))
            }
            other => other,
        }
    }

    async fn menu(&self, restaurant_id: &str, category: Option<&str>) -> Result<Vec<MenuItem>> {
        let mut request = self
            .client
            .get(self.url(&format!("/restaurants/{restaurant_id}/menu")));
        if let Some(category) = category {
            request = request.query(&[("category", category)]);
        }
        self.send(request).await
    }

    async fn search_food(&self, query: &str) -> Result<Vec<MenuItem>> {
        let request = self
            .client
            .get(self.url("/food-items/search"))
            .query(&[("q", query)]);
        self.send(request).await
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<Order> {
        tracing::debug!(
            "[StorefrontApi] POST /orders ({} items for restaurant {})",
            order.items.len(),
            order.restaurant_id
        );
        self.send(self.client.post(self.url("/orders")).json(order))
            .await
    }

    async fn order(&self, order_id: &str) -> Result<Order> {
        let request = self.client.get(self.url(&format!("/orders/{order_id}")));
        match self.send(request).await {
            Err(err) if err.http_status() == Some(404) => {
                Err(ZyppyError::not_found("order", order_id))
            }
            other => other,
        }
    }

    async fn user_orders(&self, user_id: &str) -> Result<Vec<Order>> {
        let request = self.client.get(self.url(&format!("/users/{user_id}/orders")));
        self.send(request).await
    }

    async fn create_checkout(&self, order_id: &str, origin_url: &str) -> Result<PaymentSession> {
        tracing::debug!("[StorefrontApi] POST /payments/checkout (order {order_id})");
        let body = CheckoutRequest {
            order_id,
            origin_url,
        };
        self.send(self.client.post(self.url("/payments/checkout")).json(&body))
            .await
    }

    async fn payment_status(&self, session_id: &str) -> Result<PaymentStatus> {
        tracing::debug!("[StorefrontApi] GET /payments/status/{session_id}");
        let request = self
            .client
            .get(self.url(&format!("/payments/status/{session_id}")));
        self.send(request).await
    }

    async fn create_review(&self, review: &ReviewRequest) -> Result<Review> {
        self.send(self.client.post(self.url("/reviews")).json(review))
            .await
    }

    async fn restaurant_reviews(&self, restaurant_id: &str) -> Result<Vec<Review>> {
        let request = self
            .client
            .get(self.url(&format!("/restaurants/{restaurant_id}/reviews")));
        self.send(request).await
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct CheckoutRequest<'a> {
    order_id: &'a str,
    origin_url: &'a str,
}

/// Error body the backend emits for non-success responses.
///
/// `detail` is usually a string, but request-validation failures carry a
/// structured list; both are flattened to text.
#[derive(Deserialize)]
struct ErrorResponse {
    detail: Value,
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        return Err(map_http_error(status, body));
    }
    response.json().await.map_err(|err| ZyppyError::Serialization {
        format: "JSON".to_string(),
        message: err.to_string(),
    })
}

fn map_http_error(status: StatusCode, body: String) -> ZyppyError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| match wrapper.detail {
            Value::String(text) => text,
            other => other.to_string(),
        })
        .unwrap_or(body);

    ZyppyError::transport_with_status(message, status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = HttpStorefrontApi::new("http://localhost:8000/api/");
        assert_eq!(api.url("/restaurants"), "http://localhost:8000/api/restaurants");
    }

    #[test]
    fn test_map_http_error_extracts_detail_string() {
        let err = map_http_error(
            StatusCode::NOT_FOUND,
            "{\"detail\": \"Restaurant not found\"}".to_string(),
        );
        match err {
            ZyppyError::Transport { message, status } => {
                assert_eq!(message, "Restaurant not found");
                assert_eq!(status, Some(404));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_keeps_unparsable_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        match err {
            ZyppyError::Transport { message, status } => {
                assert_eq!(message, "upstream down");
                assert_eq!(status, Some(502));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_restaurant_wire_shape() {
        let json = r#"{
            "id": "rest-1",
            "name": "Bella Vista",
            "cuisine_type": "Italian",
            "rating": 4.5,
            "delivery_time": "30-45 min",
            "delivery_fee": 2.99,
            "image_url": "https://example.com/bella.jpg",
            "description": "Authentic Italian cuisine"
        }"#;
        let restaurant: Restaurant = serde_json::from_str(json).unwrap();
        assert_eq!(restaurant.id, "rest-1");
        assert_eq!(restaurant.cuisine_type, "Italian");
        assert_eq!(restaurant.delivery_fee, 2.99);
    }

    #[test]
    fn test_menu_item_wire_shape_with_defaults() {
        let json = r#"{
            "id": "food-1",
            "restaurant_id": "rest-1",
            "name": "Margherita Pizza",
            "description": "Fresh tomatoes and mozzarella",
            "price": 12.99,
            "category": "Pizza",
            "image_url": "",
            "is_vegetarian": true
        }"#;
        let item: MenuItem = serde_json::from_str(json).unwrap();
        assert!(item.is_available, "availability defaults to true");
        assert!(item.is_vegetarian);
    }

    #[test]
    fn test_order_wire_shape() {
        let json = r#"{
            "id": "order-1",
            "user_id": "user-1",
            "restaurant_id": "rest-1",
            "items": [
                {"food_item_id": "food-1", "quantity": 2, "special_instructions": null}
            ],
            "total_amount": 28.97,
            "delivery_address": "42 Foo St",
            "status": "pending",
            "created_at": "2024-06-01T10:30:00.123456",
            "estimated_delivery": "2024-06-01T11:15:00.123456",
            "payment_session_id": null
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.status, zyppy_core::order::OrderStatus::Pending);
        assert_eq!(order.payment_session_id, None);
    }

    #[test]
    fn test_payment_status_wire_shape_with_integer_amount() {
        let json = r#"{
            "status": "complete",
            "payment_status": "paid",
            "amount_total": 2897,
            "currency": "usd"
        }"#;
        let status: PaymentStatus = serde_json::from_str(json).unwrap();
        assert!(status.is_paid());
        assert_eq!(status.amount_total, Some(2897.0));
    }

    #[test]
    fn test_checkout_session_wire_shape() {
        let json = r#"{
            "url": "https://checkout.stripe.com/pay/cs_test_42",
            "session_id": "cs_test_42"
        }"#;
        let session: PaymentSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.session_id, "cs_test_42");
    }
}
