//! Webhook transport — exactly one HTTP POST per call, outcome classified.
//!
//! Retries are deliberately not handled here: the transport stays a
//! one-shot primitive so the retry controller above it owns all timing.

use std::time::Duration;

use async_trait::async_trait;

use feedwarden_common::config::DeliveryConfig;

/// An external channel endpoint credential that accepts POSTed messages.
#[derive(Clone, PartialEq, Eq)]
pub struct Destination(String);

impl Destination {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn url(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // webhook URLs embed an auth token; keep them out of logs
        f.write_str("Destination(..)")
    }
}

/// Classified result of a single send attempt.
#[derive(Debug)]
pub enum SendOutcome {
    /// Remote accepted the message (any 2xx, including 204).
    Success,
    /// Remote signaled rate limiting; wait at least `retry_after` first.
    RateLimited { retry_after: Duration },
    /// Non-success status other than 429. Not worth retrying.
    Fatal { status: u16, body: String },
    /// Connection-level failure (DNS, TCP, TLS).
    NetworkError { cause: String },
}

/// One-shot message send. Implementations must perform at most one
/// outbound request per call.
#[async_trait]
pub trait Transport {
    async fn send(&self, destination: &Destination, content: &str) -> SendOutcome;
}

/// Discord-webhook transport over reqwest.
pub struct WebhookTransport {
    client: reqwest::Client,
    username: String,
    retry_after_fallback: Duration,
    seconds_threshold: f64,
}

impl WebhookTransport {
    pub fn new(config: &DeliveryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            username: config.username.clone(),
            retry_after_fallback: Duration::from_millis(config.retry_after_fallback_ms),
            seconds_threshold: config.retry_after_seconds_threshold,
        }
    }
}

#[async_trait]
impl Transport for WebhookTransport {
    async fn send(&self, destination: &Destination, content: &str) -> SendOutcome {
        let payload = serde_json::json!({
            "username": self.username,
            "content": content,
        });

        let response = match self
            .client
            .post(destination.url())
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return SendOutcome::NetworkError {
                    cause: e.to_string(),
                };
            }
        };

        let status = response.status();
        if status.is_success() {
            return SendOutcome::Success;
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let header_hint = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<f64>().ok());

            // Discord also reports the wait in the 429 body
            let hint = match header_hint {
                Some(h) => Some(h),
                None => response
                    .json::<serde_json::Value>()
                    .await
                    .ok()
                    .and_then(|v| v.get("retry_after").and_then(|r| r.as_f64())),
            };

            return SendOutcome::RateLimited {
                retry_after: correct_retry_after(
                    hint,
                    self.seconds_threshold,
                    self.retry_after_fallback,
                ),
            };
        }

        let body = response.text().await.unwrap_or_default();
        SendOutcome::Fatal {
            status: status.as_u16(),
            body,
        }
    }
}

/// Resolve a raw rate-limit hint into a wait duration.
///
/// The hint format is ambiguous between seconds and milliseconds across
/// webhook implementations: values below `seconds_threshold` are treated as
/// seconds and scaled up, larger values as already-milliseconds. Absent or
/// non-positive hints get the fixed fallback.
fn correct_retry_after(hint: Option<f64>, seconds_threshold: f64, fallback: Duration) -> Duration {
    match hint {
        Some(v) if v > 0.0 => {
            if v < seconds_threshold {
                Duration::from_millis((v * 1000.0) as u64)
            } else {
                Duration::from_millis(v as u64)
            }
        }
        _ => fallback,
    }
}
