//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::store::StoreError;

/// Runs `f` until it succeeds or the retry policy says to stop, sleeping for
/// the backoff between attempts. `what` names the operation in logs.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, what: &str, mut f: F) -> Result<T, StoreError>
where
    F: FnMut() -> Result<T, StoreError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::warn!(
                            "{} failed (attempt {}): {}; retrying in {:?}",
                            what,
                            attempt,
                            e,
                            d
                        );
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn retries_transient_until_success() {
        let mut calls = 0;
        let out = run_with_retry(&fast_policy(5), "list", || {
            calls += 1;
            if calls < 3 {
                Err(StoreError::Http {
                    status: 503,
                    url: "u".into(),
                })
            } else {
                Ok(calls)
            }
        })
        .unwrap();
        assert_eq!(out, 3);
    }

    #[test]
    fn permanent_error_is_not_retried() {
        let mut calls = 0;
        let err = run_with_retry(&fast_policy(5), "list", || -> Result<(), _> {
            calls += 1;
            Err(StoreError::Http {
                status: 404,
                url: "u".into(),
            })
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert!(matches!(err, StoreError::Http { status: 404, .. }));
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let res = run_with_retry(&fast_policy(3), "download", || -> Result<(), _> {
            calls += 1;
            Err(StoreError::PartialTransfer {
                expected: 2,
                received: 1,
            })
        });
        assert!(res.is_err());
        assert_eq!(calls, 3);
    }
}
