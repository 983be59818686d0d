//! Retry and backoff policy for object-store calls.
//!
//! Classifies transport errors (timeouts, throttling, connection failures,
//! 5xx) and decides exponential backoff, so listing, media download and token
//! exchange share one policy.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
