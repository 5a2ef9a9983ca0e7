//! Retry with exponential back-off and jitter for image downloads.

use std::future::Future;
use std::time::Duration;

use crate::error::MediaError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Timeouts, connection failures, 5xx and 429 responses are transient.
/// Everything else (404, wrong content type, oversized body, disk errors)
/// fails immediately.
pub(crate) fn is_retriable(err: &MediaError) -> bool {
    match err {
        MediaError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        MediaError::Status { status, .. } => *status == 429 || (500..600).contains(status),
        MediaError::InvalidUrl(_)
        | MediaError::NotAnImage { .. }
        | MediaError::TooLarge { .. }
        | MediaError::Io { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The delay before retry `n` is `backoff_base_ms * 2^(n-1)` scaled by a
/// random factor in `[0.75, 1.25)`, capped at 30 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, MediaError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MediaError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "image download failed; retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn status(code: u16) -> MediaError {
        MediaError::Status {
            url: "https://img.example.com/a.png".to_owned(),
            status: code,
        }
    }

    #[test]
    fn server_errors_and_throttling_are_retriable() {
        assert!(is_retriable(&status(500)));
        assert!(is_retriable(&status(503)));
        assert!(is_retriable(&status(429)));
    }

    #[test]
    fn client_errors_are_not_retriable() {
        assert!(!is_retriable(&status(404)));
        assert!(!is_retriable(&status(403)));
        assert!(!is_retriable(&MediaError::NotAnImage {
            url: "u".to_owned(),
            content_type: "text/html".to_owned(),
        }));
        assert!(!is_retriable(&MediaError::TooLarge {
            url: "u".to_owned(),
            limit: 1,
        }));
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = retry_with_backoff(3, 1, move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(status(502))
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_after_max_retries() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), _> = retry_with_backoff(2, 1, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(status(500))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn terminal_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), _> = retry_with_backoff(5, 1, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(status(404))
        })
        .await;

        assert!(matches!(result, Err(MediaError::Status { status: 404, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
