//! Bounded retry with exponential backoff

use crate::config::RetryPolicy;
use crate::error::{CliError, Result};
use std::future::Future;
use tracing::warn;

/// Run `op` until it succeeds, fails permanently, or the policy runs out.
///
/// Only errors for which [`CliError::is_transient`] holds are retried. When
/// the last allowed attempt still fails transiently the error is wrapped in
/// [`CliError::RetriesExhausted`].
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, operation: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) if attempt >= policy.max_retries => {
                return Err(CliError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(e),
                });
            },
            Err(e) => {
                let backoff = policy.backoff(attempt);
                warn!(
                    operation,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "Request failed, retrying..."
                );
                tokio::time::sleep(backoff).await;
            },
        }
    }
}
