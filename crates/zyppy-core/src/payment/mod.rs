//! Payment domain module.
//!
//! # Module Structure
//!
//! - `model`: Checkout session wire models (`PaymentSession`, `PaymentStatus`)
//! - `flow`: Checkout phases and the bounded status poll (`StatusPoll`)

mod flow;
mod model;

// Re-export public API
pub use flow::{
    CheckoutPhase, MAX_STATUS_CHECKS, POLL_INTERVAL_MS, PaymentOutcome, PollStep, StatusPoll,
};
pub use model::{PaymentSession, PaymentStatus};
