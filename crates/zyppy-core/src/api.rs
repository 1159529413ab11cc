//! Storefront API trait.
//!
//! Defines the interface to the backend REST surface. Application services
//! depend on this trait, never on a concrete HTTP client, so tests can
//! substitute scripted implementations.

use crate::catalog::{MenuItem, Restaurant};
use crate::error::Result;
use crate::order::{Order, OrderRequest, Review, ReviewRequest};
use crate::payment::{PaymentSession, PaymentStatus};
use crate::session::Session;
use async_trait::async_trait;

/// The backend REST surface, one method per endpoint the client uses.
///
/// All methods are request/response one-shots; the trait carries no state.
/// Errors come back as [`ZyppyError`](crate::ZyppyError): `Transport` for
/// connection problems and non-success responses, `NotFound` for 404s on
/// entity lookups.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Exchanges an email for the user's identity, creating the account on
    /// first login.
    async fn login(&self, email: &str) -> Result<Session>;

    /// Lists restaurants, optionally narrowed by a name/description search
    /// and/or a cuisine label.
    async fn restaurants(
        &self,
        search: Option<&str>,
        cuisine: Option<&str>,
    ) -> Result<Vec<Restaurant>>;

    /// Fetches a single restaurant.
    async fn restaurant(&self, restaurant_id: &str) -> Result<Restaurant>;

    /// Fetches a restaurant's menu, optionally narrowed to one category.
    /// Only available items are returned.
    async fn menu(&self, restaurant_id: &str, category: Option<&str>) -> Result<Vec<MenuItem>>;

    /// Searches dishes across all restaurants.
    async fn search_food(&self, query: &str) -> Result<Vec<MenuItem>>;

    /// Creates an order; the backend prices it and returns the full record.
    async fn create_order(&self, request: &OrderRequest) -> Result<Order>;

    /// Fetches a single order.
    async fn order(&self, order_id: &str) -> Result<Order>;

    /// Fetches a user's orders, newest first.
    async fn user_orders(&self, user_id: &str) -> Result<Vec<Order>>;

    /// Opens a hosted checkout session for an order. `origin_url` is the
    /// address the payment page redirects back to.
    async fn create_checkout(&self, order_id: &str, origin_url: &str) -> Result<PaymentSession>;

    /// Reads the current state of a checkout session.
    async fn payment_status(&self, session_id: &str) -> Result<PaymentStatus>;

    /// Posts a review for an order.
    async fn create_review(&self, request: &ReviewRequest) -> Result<Review>;

    /// Lists a restaurant's reviews.
    async fn restaurant_reviews(&self, restaurant_id: &str) -> Result<Vec<Review>>;
}
