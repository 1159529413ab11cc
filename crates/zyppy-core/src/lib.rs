//! Core domain for the Zyppy storefront client.
//!
//! This crate holds everything the client knows independent of transport
//! and presentation: the catalog and order wire models, the cart engine
//! with its single-restaurant rule, the navigation-token router, the
//! checkout flow's bounded status poll, and the traits the outer layers
//! implement (`StorefrontApi`, `SessionRepository`).

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod order;
pub mod payment;
pub mod route;
pub mod session;

// Re-export common error type
pub use error::{Result, ZyppyError};
