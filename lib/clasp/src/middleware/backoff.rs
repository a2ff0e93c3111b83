//! Backoff middleware for HTTP requests.
//!
//! Retries a request until a predicate accepts the outcome, sleeping between
//! attempts. The delay grows linearly: after the failed attempt with index `i`
//! (starting at zero) the delay grows by `base_delay * i`.
//!
//! The delay is owned by the wrapping client, not by a single call: it starts
//! at zero when the layer is applied and keeps growing across every call made
//! through that client.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use tower::Layer;
use tracing::{debug, warn};

use crate::{Error, HttpClient, Request, Response, Result};

/// Predicate deciding whether an attempt succeeded.
pub type GoodRequestFn = Arc<dyn Fn(&Result<Response>) -> bool + Send + Sync>;

/// Accept an outcome iff it is a response whose status is in `statuses`.
///
/// Errors are never accepted.
///
/// ```
/// use clasp::middleware::status_in;
/// use clasp::{Error, Response};
///
/// let is_good = status_in([200, 400]);
/// assert!(is_good(&Ok(Response::with_status(400, ""))));
/// assert!(!is_good(&Ok(Response::with_status(500, ""))));
/// assert!(!is_good(&Err(Error::NoMatch)));
/// ```
pub fn status_in(statuses: impl IntoIterator<Item = u16>) -> GoodRequestFn {
    let statuses: Vec<u16> = statuses.into_iter().collect();
    Arc::new(move |result: &Result<Response>| {
        result
            .as_ref()
            .is_ok_and(|response| statuses.contains(&response.status()))
    })
}

/// Layer that retries requests with a growing delay.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use clasp::middleware::{BackoffLayer, status_in};
///
/// let layer = BackoffLayer::new(5, Duration::from_millis(100), status_in([200]));
/// ```
#[derive(Clone)]
pub struct BackoffLayer {
    max_attempts: u32,
    base_delay: Duration,
    is_good: GoodRequestFn,
}

impl std::fmt::Debug for BackoffLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackoffLayer")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .finish_non_exhaustive()
    }
}

impl BackoffLayer {
    /// Create a backoff layer.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration, is_good: GoodRequestFn) -> Self {
        Self {
            max_attempts,
            base_delay,
            is_good,
        }
    }

    /// Maximum number of attempts per call.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay step.
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }
}

impl<C> Layer<C> for BackoffLayer {
    type Service = Backoff<C>;

    fn layer(&self, inner: C) -> Self::Service {
        Backoff {
            inner,
            max_attempts: self.max_attempts,
            base_delay: self.base_delay,
            is_good: Arc::clone(&self.is_good),
            next_delay: Mutex::new(Duration::ZERO),
        }
    }
}

/// Client that retries requests with a growing delay.
pub struct Backoff<C> {
    inner: C,
    max_attempts: u32,
    base_delay: Duration,
    is_good: GoodRequestFn,
    /// Shared by every call through this client.
    next_delay: Mutex<Duration>,
}

impl<C> std::fmt::Debug for Backoff<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backoff")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("next_delay", &self.current_delay())
            .finish_non_exhaustive()
    }
}

impl<C> Backoff<C> {
    /// Delay the next rejected attempt will sleep for.
    #[must_use]
    pub fn current_delay(&self) -> Duration {
        *self
            .next_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the delay to sleep now and grows it for the next rejection.
    fn advance_delay(&self, attempt: u32) -> Duration {
        let mut next_delay = self
            .next_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let delay = *next_delay;
        *next_delay = next_delay.saturating_add(self.base_delay.saturating_mul(attempt));
        delay
    }
}

impl<C: HttpClient> HttpClient for Backoff<C> {
    fn execute(&self, request: Request) -> Result<Response> {
        for attempt in 0..self.max_attempts {
            let result = self.inner.execute(request.clone());
            if (self.is_good)(&result) {
                return result;
            }

            let delay = self.advance_delay(attempt);
            match &result {
                Ok(response) => debug!(
                    attempt,
                    status = response.status(),
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "response rejected, backing off"
                ),
                Err(err) => debug!(
                    attempt,
                    error = %err,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "request failed, backing off"
                ),
            }
            thread::sleep(delay);
        }

        warn!(attempts = self.max_attempts, uri = %request.uri(), "giving up");
        Err(Error::RetriesExhausted {
            attempts: self.max_attempts,
        })
    }
}
