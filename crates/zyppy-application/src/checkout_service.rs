//! Checkout use case: order submission and payment verification.
//!
//! The submission leg validates user input before any network call, then
//! creates the order and opens the hosted checkout session. The return leg
//! drives the bounded status poll from `zyppy_core::payment` with an
//! injectable scheduler and a cancellation token, so navigating away never
//! leaves a timer holding a pending query.

use crate::scheduler::PollScheduler;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use zyppy_core::api::StorefrontApi;
use zyppy_core::cart::Cart;
use zyppy_core::error::{Result, ZyppyError};
use zyppy_core::order::{Order, OrderRequest};
use zyppy_core::payment::{
    POLL_INTERVAL_MS, PaymentOutcome, PaymentSession, PaymentStatus, PollStep, StatusPoll,
};
use zyppy_core::session::Session;

/// How the payment-return leg ended.
#[derive(Debug, Clone)]
pub struct PaymentResolution {
    pub outcome: PaymentOutcome,
    /// The status report that settled the poll; present for `Success` and
    /// `Failed`, where the backend actually answered conclusively.
    pub status: Option<PaymentStatus>,
}

/// Use case service for the checkout flow.
pub struct CheckoutService {
    /// Backend API for order and payment endpoints
    api: Arc<dyn StorefrontApi>,
    /// Delay source between status queries
    scheduler: Arc<dyn PollScheduler>,
}

impl CheckoutService {
    /// Creates a new `CheckoutService` instance.
    pub fn new(api: Arc<dyn StorefrontApi>, scheduler: Arc<dyn PollScheduler>) -> Self {
        Self { api, scheduler }
    }

    /// Submits the cart as an order and opens a hosted checkout session.
    ///
    /// Validation happens before any network call: a session must be
    /// present, the cart non-empty and the delivery address non-blank.
    /// The cart is never mutated here, so after any failure the user can
    /// fix the problem and retry with the same contents.
    ///
    /// On success the caller holds the payment redirect; control moves to
    /// the external payment page.
    pub async fn submit(
        &self,
        session: Option<&Session>,
        cart: &Cart,
        delivery_address: &str,
        origin_url: &str,
    ) -> Result<(Order, PaymentSession)> {
        let session =
            session.ok_or_else(|| ZyppyError::validation("Login required before checkout"))?;
        if cart.is_empty() {
            return Err(ZyppyError::validation("Cart is empty"));
        }
        let delivery_address = delivery_address.trim();
        if delivery_address.is_empty() {
            return Err(ZyppyError::validation("Delivery address must not be empty"));
        }

        tracing::info!(
            "[CheckoutService] Submitting order ({} lines, total {:.2})",
            cart.lines().len(),
            cart.total()
        );
        let request = OrderRequest::from_cart(cart, &session.id, delivery_address);
        let order = self.api.create_order(&request).await?;
        let payment = self.api.create_checkout(&order.id, origin_url).await?;
        tracing::info!(
            "[CheckoutService] Awaiting payment redirect for order {}",
            order.id
        );
        Ok((order, payment))
    }

    /// Verifies a returning payment session with a bounded status poll.
    ///
    /// The cart is cleared before the first query, whatever the eventual
    /// outcome. The poll asks the backend at most
    /// [`MAX_STATUS_CHECKS`](zyppy_core::payment::MAX_STATUS_CHECKS) times,
    /// [`POLL_INTERVAL_MS`] apart; a conclusive report or a transport
    /// failure ends it early. Cancelling the token stops the loop at its
    /// next wait point without issuing another query.
    pub async fn resolve_payment(
        &self,
        payment_session_id: &str,
        cart: Arc<Mutex<Cart>>,
        cancel: CancellationToken,
    ) -> PaymentResolution {
        cart.lock().await.clear();
        tracing::info!("[CheckoutService] Verifying payment session {payment_session_id}");

        let mut poll = StatusPoll::new();
        loop {
            if cancel.is_cancelled() {
                return PaymentResolution {
                    outcome: poll.cancel(),
                    status: None,
                };
            }
            match poll.next_step() {
                PollStep::Settled(outcome) => {
                    tracing::info!("[CheckoutService] Payment poll settled: {outcome:?}");
                    return PaymentResolution {
                        outcome,
                        status: None,
                    };
                }
                PollStep::Query { attempt } => {
                    tracing::debug!(
                        "[CheckoutService] Status query {} for {payment_session_id}",
                        attempt + 1
                    );
                    match self.api.payment_status(payment_session_id).await {
                        Ok(status) => {
                            if let Some(outcome) = poll.observe(&status) {
                                tracing::info!(
                                    "[CheckoutService] Payment poll settled: {outcome:?}"
                                );
                                return PaymentResolution {
                                    outcome,
                                    status: Some(status),
                                };
                            }
                            tokio::select! {
                                _ = cancel.cancelled() => {}
                                _ = self
                                    .scheduler
                                    .wait(Duration::from_millis(POLL_INTERVAL_MS)) => {}
                            }
                        }
                        Err(err) => {
                            tracing::warn!("[CheckoutService] Status query failed: {err}");
                            return PaymentResolution {
                                outcome: poll.fail(),
                                status: None,
                            };
                        }
                    }
                }
            }
        }
    }
}
