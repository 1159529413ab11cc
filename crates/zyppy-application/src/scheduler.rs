//! Poll scheduling seam.
//!
//! The delay between payment status queries sits behind a trait so the
//! polling driver can be tested without real timers.

use async_trait::async_trait;
use std::time::Duration;

/// Waits out the spacing between two status queries.
#[async_trait]
pub trait PollScheduler: Send + Sync {
    async fn wait(&self, delay: Duration);
}

/// Production scheduler backed by the tokio timer.
pub struct TokioScheduler;

#[async_trait]
impl PollScheduler for TokioScheduler {
    async fn wait(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
