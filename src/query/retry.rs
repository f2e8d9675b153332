// Retry wrapper for read operations.
// Transient failures (server errors, network errors) are retried with a
// short backoff; auth failures and other client errors are terminal.

use std::time::Duration;

use crate::error::Result;

/// Retry ceiling: total attempts including the first.
pub const MAX_ATTEMPTS: u32 = 3;

const BACKOFF: Duration = Duration::from_millis(250);

/// Run an async operation, retrying retryable failures up to `MAX_ATTEMPTS`.
pub async fn with_retry<T, F, Fut>(mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < MAX_ATTEMPTS && err.is_retryable() => {
                tokio::time::sleep(BACKOFF * attempt).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeckError;
    use std::cell::Cell;

    fn server_error() -> DeckError {
        DeckError::Status {
            status: 500,
            message: "Internal Server Error".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_server_error_retried_to_ceiling() {
        let calls = Cell::new(0u32);
        let result: Result<()> = with_retry(|| {
            calls.set(calls.get() + 1);
            async { Err(server_error()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), MAX_ATTEMPTS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_failure_not_retried() {
        let calls = Cell::new(0u32);
        let result: Result<()> = with_retry(|| {
            calls.set(calls.get() + 1);
            async { Err(DeckError::Unauthorized) }
        })
        .await;

        assert!(result.unwrap_err().is_auth_failure());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failure() {
        let calls = Cell::new(0u32);
        let result = with_retry(|| {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 2 {
                    Err(server_error())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_name_not_retried() {
        let calls = Cell::new(0u32);
        let result: Result<()> = with_retry(|| {
            calls.set(calls.get() + 1);
            async { Err(DeckError::NameExists) }
        })
        .await;

        assert!(matches!(result, Err(DeckError::NameExists)));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_try() {
        let calls = Cell::new(0u32);
        let result = with_retry(|| {
            calls.set(calls.get() + 1);
            async { Ok(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 1);
    }
}
