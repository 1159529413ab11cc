//! Checkout flow states and the bounded status poll.
//!
//! After the user returns from the hosted payment page the client asks the
//! backend for the session's state a limited number of times. The retry
//! budget and spacing live here as an explicit state machine so the loop
//! can be driven by any scheduler, including an instant one in tests.

use super::model::PaymentStatus;

/// Maximum number of status queries per returning payment session.
pub const MAX_STATUS_CHECKS: u32 = 5;

/// Delay between two status queries.
pub const POLL_INTERVAL_MS: u64 = 2000;

/// Terminal outcome of the payment-return leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The backend reported the session as paid.
    Success,
    /// The backend reported the session as expired.
    Failed,
    /// The retry budget ran out before a conclusive report.
    Timeout,
    /// A status query failed in transport; no further queries are made.
    Error,
    /// The poll was abandoned, e.g. the user navigated away.
    Cancelled,
}

/// Client-side phase of the checkout flow, as rendered by the screens.
///
/// `Idle → Submitting → AwaitingPaymentRedirect` covers the submission leg;
/// control then leaves the client until the user returns with a session id,
/// at which point the flow is `Checking` until the poll settles.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutPhase {
    Idle,
    Submitting,
    AwaitingPaymentRedirect { url: String },
    Checking,
    Settled(PaymentOutcome),
}

/// What the poll driver should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    /// Issue status query number `attempt` (zero-based).
    Query { attempt: u32 },
    /// The poll is over; no further queries.
    Settled(PaymentOutcome),
}

/// Bounded-retry state machine for the payment status poll.
///
/// The driver alternates [`next_step`](Self::next_step) with feeding the
/// query result back via [`observe`](Self::observe) (or
/// [`fail`](Self::fail)/[`cancel`](Self::cancel)). The budget check happens
/// before each query, so a session that never resolves is queried exactly
/// [`MAX_STATUS_CHECKS`] times and then times out. Once settled, every
/// method keeps returning the same outcome; terminal states absorb.
#[derive(Debug, Default)]
pub struct StatusPoll {
    attempts: u32,
    outcome: Option<PaymentOutcome>,
}

impl StatusPoll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides the next move: another query, or the settled outcome.
    pub fn next_step(&mut self) -> PollStep {
        if let Some(outcome) = self.outcome {
            return PollStep::Settled(outcome);
        }
        if self.attempts >= MAX_STATUS_CHECKS {
            self.outcome = Some(PaymentOutcome::Timeout);
            return PollStep::Settled(PaymentOutcome::Timeout);
        }
        let attempt = self.attempts;
        self.attempts += 1;
        PollStep::Query { attempt }
    }

    /// Feeds one successful query result into the machine.
    ///
    /// Returns the settled outcome if this observation (or a previous one)
    /// was conclusive, `None` when the poll should continue.
    pub fn observe(&mut self, status: &PaymentStatus) -> Option<PaymentOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        if status.is_paid() {
            self.outcome = Some(PaymentOutcome::Success);
        } else if status.is_expired() {
            self.outcome = Some(PaymentOutcome::Failed);
        }
        self.outcome
    }

    /// Records a transport failure. The poll ends; no retry.
    pub fn fail(&mut self) -> PaymentOutcome {
        *self.outcome.get_or_insert(PaymentOutcome::Error)
    }

    /// Abandons the poll unless it already settled.
    pub fn cancel(&mut self) -> PaymentOutcome {
        *self.outcome.get_or_insert(PaymentOutcome::Cancelled)
    }

    pub fn outcome(&self) -> Option<PaymentOutcome> {
        self.outcome
    }

    pub fn is_settled(&self) -> bool {
        self.outcome.is_some()
    }

    /// Number of queries issued so far.
    pub fn attempts_used(&self) -> u32 {
        self.attempts
    }
}
