//! Rate-limit retry policy.
//!
//! Pure decision logic: given the status and headers of a response and how
//! many consecutive 429s the current request has seen, decide whether to wait
//! and retry. No I/O happens here; the session does the sleeping.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Backoff seed used when a 429 carries no usable `Retry-After`.
pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(15);
/// Upper bound for computed backoff waits.
pub const DEFAULT_MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(300);
/// Consecutive 429 responses tolerated before giving up.
pub const DEFAULT_MAX_RATE_LIMIT_ATTEMPTS: u32 = 10;

/// Outcome of consulting the policy for one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    /// Whether the request should be sent again.
    pub retry: bool,
    /// How long to wait before the retry; zero when not retrying.
    pub wait: Duration,
}

impl RetryDecision {
    /// Decision that stops retrying.
    pub const STOP: Self = Self {
        retry: false,
        wait: Duration::ZERO,
    };
}

/// Retry policy for HTTP 429 responses.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use reqwest::StatusCode;
/// use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
/// use spark_client::RateLimitPolicy;
///
/// let policy = RateLimitPolicy::default();
/// let mut headers = HeaderMap::new();
/// headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
///
/// let decision = policy.should_retry(StatusCode::TOO_MANY_REQUESTS, &headers, 1);
/// assert!(decision.retry);
/// assert_eq!(decision.wait, Duration::from_secs(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    initial_wait: Duration,
    max_wait: Duration,
    max_attempts: u32,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_RATE_LIMIT_WAIT,
            DEFAULT_MAX_RATE_LIMIT_WAIT,
            DEFAULT_MAX_RATE_LIMIT_ATTEMPTS,
        )
    }
}

impl RateLimitPolicy {
    /// Build a policy. `max_attempts` is clamped to at least one.
    #[must_use]
    pub const fn new(initial_wait: Duration, max_wait: Duration, max_attempts: u32) -> Self {
        Self {
            initial_wait,
            max_wait,
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
        }
    }

    /// Policy that never waits: the first 429 is surfaced to the caller.
    #[must_use]
    pub const fn fail_fast() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, 1)
    }

    /// Consecutive 429 responses tolerated before giving up.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decide whether to retry after a response.
    ///
    /// `attempt` counts the consecutive 429 responses received so far for
    /// this request, including the one being evaluated.
    #[must_use]
    pub fn should_retry(
        &self,
        status: StatusCode,
        headers: &HeaderMap,
        attempt: u32,
    ) -> RetryDecision {
        if status != StatusCode::TOO_MANY_REQUESTS || attempt >= self.max_attempts {
            return RetryDecision::STOP;
        }

        let wait = retry_after(headers).unwrap_or_else(|| self.backoff(attempt));
        RetryDecision { retry: true, wait }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_wait.saturating_mul(exponent).min(self.max_wait)
    }
}

/// Parse a `Retry-After` header given in whole seconds.
///
/// HTTP-date values and garbage are ignored.
#[must_use]
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for rate-limit decisions.

    use super::*;
    use reqwest::header::HeaderValue;
    use rstest::rstest;

    fn headers_with_retry_after(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static(value));
        headers
    }

    #[rstest]
    #[case(1, 15)]
    #[case(2, 30)]
    #[case(3, 60)]
    #[case(5, 240)]
    #[case(6, 300)]
    #[case(9, 300)]
    fn backs_off_exponentially_without_retry_after(
        #[case] attempt: u32,
        #[case] expected_secs: u64,
    ) {
        let decision = RateLimitPolicy::default().should_retry(
            StatusCode::TOO_MANY_REQUESTS,
            &HeaderMap::new(),
            attempt,
        );
        assert!(decision.retry);
        assert_eq!(decision.wait, Duration::from_secs(expected_secs));
    }

    #[rstest]
    #[case("0", 0)]
    #[case("3", 3)]
    #[case(" 42 ", 42)]
    #[case("3600", 3600)]
    fn honours_retry_after_verbatim(#[case] header: &'static str, #[case] expected_secs: u64) {
        let decision = RateLimitPolicy::default().should_retry(
            StatusCode::TOO_MANY_REQUESTS,
            &headers_with_retry_after(header),
            4,
        );
        assert!(decision.retry);
        assert_eq!(decision.wait, Duration::from_secs(expected_secs));
    }

    #[rstest]
    #[case("Wed, 21 Oct 2015 07:28:00 GMT")]
    #[case("-5")]
    #[case("soon")]
    fn unusable_retry_after_falls_back_to_backoff(#[case] header: &'static str) {
        let decision = RateLimitPolicy::default().should_retry(
            StatusCode::TOO_MANY_REQUESTS,
            &headers_with_retry_after(header),
            2,
        );
        assert_eq!(decision.wait, Duration::from_secs(30));
    }

    #[rstest]
    fn stops_once_attempts_reach_the_maximum() {
        let policy = RateLimitPolicy::new(Duration::from_secs(1), Duration::from_secs(10), 3);
        let headers = headers_with_retry_after("1");
        assert!(policy.should_retry(StatusCode::TOO_MANY_REQUESTS, &headers, 2).retry);
        assert_eq!(
            policy.should_retry(StatusCode::TOO_MANY_REQUESTS, &headers, 3),
            RetryDecision::STOP
        );
    }

    #[rstest]
    #[case(StatusCode::OK)]
    #[case(StatusCode::NO_CONTENT)]
    #[case(StatusCode::SERVICE_UNAVAILABLE)]
    #[case(StatusCode::BAD_REQUEST)]
    fn never_retries_other_statuses(#[case] status: StatusCode) {
        let decision =
            RateLimitPolicy::default().should_retry(status, &headers_with_retry_after("1"), 1);
        assert_eq!(decision, RetryDecision::STOP);
    }

    #[rstest]
    fn fail_fast_surfaces_the_first_429() {
        let decision = RateLimitPolicy::fail_fast().should_retry(
            StatusCode::TOO_MANY_REQUESTS,
            &HeaderMap::new(),
            1,
        );
        assert_eq!(decision, RetryDecision::STOP);
    }

    #[rstest]
    fn zero_max_attempts_is_clamped() {
        assert_eq!(
            RateLimitPolicy::new(Duration::ZERO, Duration::ZERO, 0).max_attempts(),
            1
        );
    }

    #[rstest]
    fn huge_attempt_counts_saturate_at_the_cap() {
        let policy =
            RateLimitPolicy::new(Duration::from_secs(15), Duration::from_secs(300), u32::MAX);
        let decision = policy.should_retry(StatusCode::TOO_MANY_REQUESTS, &HeaderMap::new(), 64);
        assert_eq!(decision.wait, Duration::from_secs(300));
    }
}
