//! Retry controller — bounded exponential backoff keyed off the remote's
//! rate-limit signal.
//!
//! Only the explicit rate-limit outcome is retried. Fatal statuses and
//! network errors surface immediately: a fatal status means the request
//! itself was rejected, and retrying a dead host risks an open-ended stall.

use std::time::Duration;

use thiserror::Error;

use feedwarden_common::config::DeliveryConfig;

use crate::transport::{Destination, SendOutcome, Transport};

/// Terminal failure for one message's delivery loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeliveryError {
    #[error("webhook returned HTTP {status}: {body}")]
    Fatal { status: u16, body: String },

    #[error("network error: {cause}")]
    Network { cause: String },

    #[error("retry budget exhausted after {attempts} rate-limited attempts")]
    RetryBudgetExhausted { attempts: u32 },
}

/// Wraps a [`Transport`] with the per-message delivery loop.
pub struct Courier<T: Transport> {
    pub(crate) transport: T,
    config: DeliveryConfig,
}

impl<T: Transport> Courier<T> {
    pub fn new(transport: T, config: DeliveryConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Deliver `content` to `destination`, retrying only on rate limiting.
    ///
    /// Per rate-limited attempt the wait is the remote's hint scaled by
    /// `backoff_factor^(attempt-1)` and capped at `backoff_cap_ms`. After
    /// `max_retries` rate-limited attempts the delivery fails terminally.
    pub async fn deliver(
        &self,
        destination: &Destination,
        content: &str,
    ) -> Result<(), DeliveryError> {
        let mut attempt = 0u32;

        loop {
            match self.transport.send(destination, content).await {
                SendOutcome::Success => return Ok(()),
                SendOutcome::RateLimited { retry_after } => {
                    attempt += 1;
                    if attempt > self.config.max_retries {
                        return Err(DeliveryError::RetryBudgetExhausted { attempts: attempt });
                    }

                    let wait = backoff_delay(
                        retry_after,
                        attempt,
                        self.config.backoff_factor,
                        Duration::from_millis(self.config.backoff_cap_ms),
                    );
                    tracing::warn!(
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        "Rate limited, backing off before retry"
                    );
                    tokio::time::sleep(wait).await;
                }
                SendOutcome::Fatal { status, body } => {
                    return Err(DeliveryError::Fatal { status, body });
                }
                SendOutcome::NetworkError { cause } => {
                    return Err(DeliveryError::Network { cause });
                }
            }
        }
    }
}

/// Backoff wait before the Nth retry: `hint * factor^(attempt-1)`, capped.
fn backoff_delay(hint: Duration, attempt: u32, factor: f64, cap: Duration) -> Duration {
    let scaled = hint.as_millis() as f64 * factor.powi(attempt as i32 - 1);
    Duration::from_millis(scaled.min(cap.as_millis() as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::scripted::ScriptedTransport;

    fn rate_limited(ms: u64) -> SendOutcome {
        SendOutcome::RateLimited {
            retry_after: Duration::from_millis(ms),
        }
    }

    fn test_config() -> DeliveryConfig {
        DeliveryConfig {
            max_retries: 5,
            backoff_factor: 1.6,
            backoff_cap_ms: 10_000,
            ..DeliveryConfig::default()
        }
    }

    fn destination() -> Destination {
        Destination::new("https://discord.test/hook")
    }

    #[test]
    fn test_backoff_grows_geometrically_and_caps() {
        let hint = Duration::from_millis(1000);
        let cap = Duration::from_millis(10_000);

        let mut previous = Duration::ZERO;
        for attempt in 1..=8 {
            let wait = backoff_delay(hint, attempt, 1.6, cap);
            assert!(wait >= previous, "wait shrank at attempt {attempt}");
            assert!(wait <= cap, "wait exceeded cap at attempt {attempt}");
            previous = wait;
        }

        assert_eq!(backoff_delay(hint, 1, 1.6, cap), Duration::from_millis(1000));
        assert_eq!(backoff_delay(hint, 2, 1.6, cap), Duration::from_millis(1600));
        // 1000 * 1.6^6 ≈ 16_777 → capped
        assert_eq!(backoff_delay(hint, 7, 1.6, cap), cap);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let transport = ScriptedTransport::new(vec![SendOutcome::Success]);
        let courier = Courier::new(transport, test_config());

        courier.deliver(&destination(), "msg").await.unwrap();
        assert_eq!(courier.transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_max_rate_limits() {
        let mut script: Vec<SendOutcome> = (0..5).map(|_| rate_limited(100)).collect();
        script.push(SendOutcome::Success);
        let transport = ScriptedTransport::new(script);
        let courier = Courier::new(transport, test_config());

        courier.deliver(&destination(), "msg").await.unwrap();
        // max_retries rate-limited attempts plus the final success
        assert_eq!(courier.transport.calls(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhaustion() {
        let script: Vec<SendOutcome> = (0..10).map(|_| rate_limited(100)).collect();
        let transport = ScriptedTransport::new(script);
        let courier = Courier::new(transport, test_config());

        let err = courier.deliver(&destination(), "msg").await.unwrap_err();
        assert_eq!(err, DeliveryError::RetryBudgetExhausted { attempts: 6 });
        // never more than max_retries + 1 transport calls
        assert_eq!(courier.transport.calls(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_follow_geometric_schedule() {
        let script = vec![rate_limited(1000), rate_limited(1000), SendOutcome::Success];
        let transport = ScriptedTransport::new(script);
        let courier = Courier::new(transport, test_config());

        let start = tokio::time::Instant::now();
        courier.deliver(&destination(), "msg").await.unwrap();
        let elapsed = start.elapsed();

        // 1000 ms (attempt 1) + 1600 ms (attempt 2)
        assert!(elapsed >= Duration::from_millis(2600));
        assert!(elapsed < Duration::from_millis(2700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_is_not_retried() {
        let transport = ScriptedTransport::new(vec![SendOutcome::Fatal {
            status: 404,
            body: "unknown webhook".to_string(),
        }]);
        let courier = Courier::new(transport, test_config());

        let err = courier.deliver(&destination(), "msg").await.unwrap_err();
        assert_eq!(
            err,
            DeliveryError::Fatal {
                status: 404,
                body: "unknown webhook".to_string(),
            }
        );
        assert_eq!(courier.transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_error_is_not_retried() {
        let transport = ScriptedTransport::new(vec![SendOutcome::NetworkError {
            cause: "connection refused".to_string(),
        }]);
        let courier = Courier::new(transport, test_config());

        let err = courier.deliver(&destination(), "msg").await.unwrap_err();
        assert!(matches!(err, DeliveryError::Network { .. }));
        assert_eq!(courier.transport.calls(), 1);
    }
}
