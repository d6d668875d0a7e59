// SPDX-License-Identifier: Apache-2.0

//! Retry policy for GitHub read requests.
//!
//! Only the transport layer ([`crate::github::GitHubTracker`]) retries, and only
//! idempotent reads. Writes are sent once so a timed-out create can never
//! produce a duplicate issue or comment.

use backon::ExponentialBuilder;

/// Determines if an HTTP status code is retryable.
///
/// Retryable status codes are 429, 500, 502, 503, 504, and 403 (GitHub
/// secondary rate limits).
#[must_use]
pub fn is_retryable_http(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504 | 403)
}

/// Determines if an octocrab error is transient and should be retried.
#[must_use]
pub fn is_retryable_octocrab(e: &octocrab::Error) -> bool {
    match e {
        octocrab::Error::GitHub { source, .. } => is_retryable_http(source.status_code.as_u16()),
        octocrab::Error::Service { .. } | octocrab::Error::Hyper { .. } => true,
        _ => false,
    }
}

/// Returns `true` when GitHub answered 404 Not Found.
#[must_use]
pub fn is_not_found(e: &octocrab::Error) -> bool {
    matches!(
        e,
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404
    )
}

/// Creates a configured exponential backoff builder for retries.
///
/// - Factor: 2 (exponential growth)
/// - Min delay: 1 second
/// - Max times: 3
/// - Jitter: enabled
#[must_use]
pub fn retry_backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_factor(2.0)
        .with_min_delay(std::time::Duration::from_secs(1))
        .with_max_times(3)
        .with_jitter()
}
