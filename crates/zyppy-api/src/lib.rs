//! HTTP client for the Zyppy backend.
//!
//! Implements [`zyppy_core::api::StorefrontApi`] over the backend's REST
//! surface with `reqwest`.

mod client;

pub use client::{DEFAULT_BASE_URL, HttpStorefrontApi};
