//! Retry with exponential back-off and jitter for the store client.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (connection failures, timeouts, 429, 5xx). Everything
//! else, including authentication and validation failures, is returned
//! immediately since a repeat would produce the same answer.

use std::future::Future;
use std::time::Duration;

use crate::error::StoreError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`StoreError::Transport`] when the request timed out or never connected.
/// - [`StoreError::RateLimited`]: the store asked us to slow down.
/// - [`StoreError::Server`]: transient server/infrastructure errors.
///
/// **Not retriable:**
/// - [`StoreError::Auth`]: the token will not become valid by waiting.
/// - [`StoreError::Validation`]: the payload is rejected as-is.
/// - [`StoreError::Deserialize`] and the remaining local errors.
pub(crate) fn is_retriable(err: &StoreError) -> bool {
    match err {
        StoreError::Transport(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        StoreError::RateLimited { .. } | StoreError::Server { .. } => true,
        StoreError::Auth { .. }
        | StoreError::Validation { .. }
        | StoreError::UnexpectedStatus { .. }
        | StoreError::Deserialize { .. }
        | StoreError::Encode { .. }
        | StoreError::InvalidBaseUrl { .. }
        | StoreError::InvalidCredential(_) => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 1_000`:
///
/// | Attempt | Sleep before next attempt        |
/// |---------|----------------------------------|
/// | 1       | 1 000 ms × 2⁰ ± 25 % jitter     |
/// | 2       | 1 000 ms × 2¹ ± 25 % jitter     |
/// | 3       | 1 000 ms × 2² ± 25 % jitter     |
///
/// A `Retry-After` hint on a 429 raises the delay to at least that many
/// seconds. Delay is capped at 60 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay_ms = backoff_delay_ms(attempt, backoff_base_ms, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient store error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

fn backoff_delay_ms(attempt: u32, backoff_base_ms: u64, err: &StoreError) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (computed.min(MAX_DELAY_MS) as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    let hinted = match err {
        StoreError::RateLimited {
            retry_after_secs: Some(secs),
            ..
        } => secs.saturating_mul(1_000),
        _ => 0,
    };
    jittered.max(hinted).min(MAX_DELAY_MS)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn server_err() -> StoreError {
        StoreError::Server {
            status: 503,
            body: "unavailable".to_owned(),
        }
    }

    #[test]
    fn auth_error_is_not_retriable() {
        assert!(!is_retriable(&StoreError::Auth {
            status: 401,
            body: String::new()
        }));
    }

    #[test]
    fn validation_error_is_not_retriable() {
        assert!(!is_retriable(&StoreError::Validation {
            status: 400,
            body: String::new()
        }));
    }

    #[test]
    fn rate_limited_and_server_errors_are_retriable() {
        assert!(is_retriable(&StoreError::RateLimited {
            retry_after_secs: None,
            body: String::new()
        }));
        assert!(is_retriable(&server_err()));
    }

    #[test]
    fn retry_after_hint_raises_delay() {
        let err = StoreError::RateLimited {
            retry_after_secs: Some(5),
            body: String::new(),
        };
        assert_eq!(backoff_delay_ms(1, 0, &err), 5_000);
    }

    #[test]
    fn delay_is_capped() {
        assert!(backoff_delay_ms(10, 1_000_000, &server_err()) <= MAX_DELAY_MS);
        let err = StoreError::RateLimited {
            retry_after_secs: Some(3_600),
            body: String::new(),
        };
        assert_eq!(backoff_delay_ms(1, 0, &err), MAX_DELAY_MS);
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, StoreError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_server_error_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(server_err())
                } else {
                    Ok::<u32, StoreError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99, "should succeed after retries");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn returns_last_error_after_exhausting_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(server_err())
            }
        })
        .await;
        // max_retries=2 → 3 total attempts
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(StoreError::Server { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_auth_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(StoreError::Auth {
                    status: 401,
                    body: "token expired".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1, "Auth must not be retried");
        assert!(matches!(result, Err(StoreError::Auth { .. })));
    }

    #[tokio::test]
    async fn retries_connect_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(1, 0, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 2 {
                    // Simulate a retriable HTTP connect error
                    let err = reqwest::Client::new()
                        .get("http://127.0.0.1:1")
                        .send()
                        .await
                        .unwrap_err();
                    Err::<u32, _>(StoreError::Transport(err))
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
