use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_retry::RetryIf;
use tracing::warn;

use super::LlmError;

/// Bounded exponential backoff for outbound model calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_delay_ms: u64,
    /// Upper bound on any single delay
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 4_000,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryPolicy {
    /// Delays between attempts: `initial_delay_ms * 2^n`, capped at `max_delay_ms`.
    pub fn delays(&self) -> Vec<Duration> {
        let max = self.max_delay_ms;
        std::iter::successors(Some(self.initial_delay_ms.min(max)), |&delay| {
            Some(delay.saturating_mul(2).min(max))
        })
        .take(self.max_attempts.saturating_sub(1) as usize)
        .map(Duration::from_millis)
        .collect()
    }
}

/// Run `operation`, retrying transient [`LlmError`]s according to `policy`.
///
/// Backoff sleeps go through the tokio timer, so other tasks keep running
/// while a retry is pending.
pub async fn retry_transient<T, F, Fut>(policy: &RetryPolicy, operation: F) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    RetryIf::spawn(policy.delays(), operation, |err: &LlmError| {
        let transient = err.is_transient();
        if transient {
            warn!("Transient language model error, retrying: {}", err);
        }
        transient
    })
    .await
}
