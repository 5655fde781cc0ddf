//! HTTP retry policy with exponential backoff.
//!
//! # Retry Policy
//!
//! - Max retries: 2 (3 total attempts)
//! - Initial delay: 250ms
//! - Max delay: 4 seconds
//! - Jitter: down-jitter up to 25% (multiplier in [0.75, 1.0])
//!
//! # Retryable Conditions
//!
//! - HTTP 408, 429, 5xx
//! - Connection and timeout errors
//!
//! Everything else (notably 404 for an unknown species) is returned on the
//! first attempt.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, header::HeaderMap};

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries (not counting the initial request).
    pub max_retries: u32,
    /// Initial backoff delay before first retry.
    pub initial_delay: Duration,
    /// Maximum backoff delay.
    pub max_delay: Duration,
    /// Jitter factor for down-jitter (0.25 = up to 25% reduction).
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
            jitter_factor: 0.25,
        }
    }
}

impl RetryConfig {
    /// A single attempt, no retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Parse a `Retry-After` header given in whole seconds.
///
/// Returns `Some(duration)` only when `0 < duration < 60s`.
#[must_use]
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let secs = headers
        .get("retry-after")?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()?;
    let duration = Duration::from_secs(secs);
    (duration > Duration::ZERO && duration < Duration::from_secs(60)).then_some(duration)
}

/// Determine if a response status is worth another attempt.
#[must_use]
pub fn should_retry(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 429 | 500..=599)
}

/// Calculate retry delay with exponential backoff and jitter.
///
/// `backoff_step` is 0 before the first retry, 1 before the second, etc.
/// A valid `Retry-After` header wins over the computed backoff.
#[must_use]
pub fn calculate_retry_delay(
    backoff_step: u32,
    config: &RetryConfig,
    headers: Option<&HeaderMap>,
) -> Duration {
    if let Some(delay) = headers.and_then(parse_retry_after) {
        return delay;
    }

    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(backoff_step as i32);
    let capped = base.min(config.max_delay.as_secs_f64());

    let jitter = 1.0 - rand::random::<f64>() * config.jitter_factor;
    Duration::from_secs_f64(capped * jitter)
}

/// Outcome of a retried request.
///
/// Structurally separates success from the two failure shapes so callers
/// cannot treat an error response as data.
#[derive(Debug)]
pub enum RetryOutcome {
    /// 2xx response.
    Success(Response),
    /// Non-2xx response, either non-retryable or after exhausting retries.
    HttpError(Response),
    /// Transport failure on the final attempt.
    ConnectionError {
        attempts: u32,
        source: reqwest::Error,
    },
}

/// Send a request, retrying transient failures.
///
/// `build_request` is called once per attempt.
pub async fn send_with_retry<F>(build_request: F, config: &RetryConfig) -> RetryOutcome
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0u32;

    loop {
        let can_retry = attempt < config.max_retries;

        match build_request().send().await {
            Ok(response) if response.status().is_success() => {
                return RetryOutcome::Success(response);
            }
            Ok(response) => {
                let status = response.status();
                if !(can_retry && should_retry(status)) {
                    return RetryOutcome::HttpError(response);
                }
                let delay = calculate_retry_delay(attempt, config, Some(response.headers()));
                tracing::debug!(
                    status = %status,
                    retry = attempt + 1,
                    delay_ms = delay.as_millis(),
                    "Retrying request after error status"
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => {
                if !(can_retry && is_retryable_error(&error)) {
                    return RetryOutcome::ConnectionError {
                        attempts: attempt + 1,
                        source: error,
                    };
                }
                let delay = calculate_retry_delay(attempt, config, None);
                tracing::debug!(
                    %error,
                    retry = attempt + 1,
                    delay_ms = delay.as_millis(),
                    "Retrying request after connection error"
                );
                tokio::time::sleep(delay).await;
            }
        }

        attempt += 1;
    }
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout() || error.is_request()
}
