// SPDX-License-Identifier: MIT

//! External collaborator interfaces and their HTTP-backed shims
//!
//! The engine only ever sees the traits. Each HTTP shim owns its endpoint
//! configuration and applies the shared bounded-retry policy; the engine
//! itself never retries.

pub mod case_store;
pub mod notification;
pub mod scheduling;

pub use case_store::{CaseStatus, CaseStore, HttpCaseStore};
pub use notification::{HttpNotificationService, NotificationService};
pub use scheduling::{HttpSchedulingService, SchedulingService};

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Attempts per collaborator call, first try included
const MAX_ATTEMPTS: u32 = 3;
/// Per-request timeout applied by every shim
pub(crate) const CALL_TIMEOUT: Duration = Duration::from_secs(10);
const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// Run `call` with bounded retry and exponential backoff.
///
/// Only transport failures and 5xx responses are retried; anything else is
/// returned immediately.
pub(crate) async fn with_retry<T, F, Fut>(service: &str, mut call: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut backoff = INITIAL_BACKOFF;
    let mut attempt = 1;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < MAX_ATTEMPTS && err.is_retryable() => {
                log::warn!(
                    "{} call failed (attempt {}/{}): {}; retrying in {:?}",
                    service,
                    attempt,
                    MAX_ATTEMPTS,
                    err,
                    backoff
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                attempt += 1;
            }
            Err(err) if err.is_retryable() => {
                return Err(ClientError::RetriesExhausted {
                    service: service.to_string(),
                    attempts: MAX_ATTEMPTS,
                    last: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_recovers_within_budget() {
        let calls = AtomicU32::new(0);

        let result = with_retry("test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ClientError::api("test", 503, "unavailable"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_budget() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retry("test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ClientError::api("test", 500, "boom")) }
        })
        .await;

        assert!(matches!(
            result.unwrap_err(),
            ClientError::RetriesExhausted { attempts: 3, .. }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retry("test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ClientError::api("test", 404, "not found")) }
        })
        .await;

        assert!(matches!(result.unwrap_err(), ClientError::Api { status: 404, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
