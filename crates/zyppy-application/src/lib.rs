//! Application layer for Zyppy.
//!
//! This crate provides use case services that coordinate between the domain
//! models and the backend API to implement the storefront's business logic.

pub mod checkout_service;
pub mod scheduler;
pub mod session_service;

pub use checkout_service::{CheckoutService, PaymentResolution};
pub use scheduler::{PollScheduler, TokioScheduler};
pub use session_service::SessionService;
