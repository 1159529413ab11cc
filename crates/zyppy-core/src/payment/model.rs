//! Payment wire models.

use serde::{Deserialize, Serialize};

/// A hosted checkout session created for an order.
///
/// The client never talks to the payment provider directly: it hands the
/// user the `url` and later recognises the returning `session_id` in the
/// navigation token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSession {
    pub session_id: String,
    /// Address of the externally hosted payment page
    pub url: String,
}

/// One observation of a checkout session's state.
///
/// `amount_total` is in the currency's minor unit (cents), mirroring the
/// payment provider's convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatus {
    /// Session lifecycle: "open", "complete", "expired", ...
    #[serde(default)]
    pub status: String,
    /// Settlement state: "paid", "unpaid", "no_payment_required", ...
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub amount_total: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl PaymentStatus {
    /// The payment settled.
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }

    /// The session lapsed without a payment.
    pub fn is_expired(&self) -> bool {
        self.status == "expired"
    }
}
