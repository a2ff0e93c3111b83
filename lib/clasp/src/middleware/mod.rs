//! Middleware layers for clasp HTTP clients.
//!
//! A [`Middleware`] turns one [`BoxClient`] into another that delegates to it.
//! Every layer in this module is a Tower [`Layer`], so it can be used directly
//! (`HeadersLayer::new(..).layer(client)`) or erased into a [`Middleware`] and
//! composed with [`chain`](crate::chain).
//!
//! Middlewares are applied in order and therefore execute in reverse order:
//! the last middleware supplied is the outermost and runs first.
//!
//! # Available Layers
//!
//! - [`HeadersLayer`] - Appends headers to every request
//! - [`BaseUrlLayer`] - Rewrites scheme and authority from a base URL
//! - [`RecoverLayer`] - Converts panics into [`Error::RecoveredPanic`](crate::Error::RecoveredPanic)
//! - [`BackoffLayer`] - Retries with a linearly growing delay
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use clasp::middleware::{self, status_in};
//!
//! let client = clasp::chain(
//!     transport,
//!     [
//!         middleware::base_url("https://api.example.com"),
//!         middleware::header("Accept", "application/json")?,
//!         middleware::backoff(3, Duration::from_millis(100), status_in([200])),
//!         middleware::recover(),
//!     ],
//! );
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tower::Layer;

use crate::{BoxClient, HttpClient, Result};

mod backoff;
mod base_url;
mod headers;
mod logging;
mod recover;

pub use backoff::{Backoff, BackoffLayer, GoodRequestFn, status_in};
pub use base_url::{BaseUrl, BaseUrlLayer};
pub use headers::{Headers, HeadersLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};
pub use recover::{Recover, RecoverLayer};

/// A behavior layer that wraps a client into a new client.
///
/// Cheap to clone; the same middleware can be applied to several clients.
#[derive(Clone)]
pub struct Middleware {
    wrap: Arc<dyn Fn(BoxClient) -> BoxClient + Send + Sync>,
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").finish_non_exhaustive()
    }
}

impl Middleware {
    /// Create a middleware from a wrapping function.
    ///
    /// ```
    /// use clasp::{HttpClient, Middleware, client_fn};
    ///
    /// let passthrough = Middleware::new(|inner| Box::new(client_fn(move |request| inner.execute(request))));
    /// ```
    pub fn new<F>(wrap: F) -> Self
    where
        F: Fn(BoxClient) -> BoxClient + Send + Sync + 'static,
    {
        Self {
            wrap: Arc::new(wrap),
        }
    }

    /// Erase a Tower layer into a middleware.
    pub fn from_layer<L>(layer: L) -> Self
    where
        L: Layer<BoxClient> + Send + Sync + 'static,
        L::Service: HttpClient + 'static,
    {
        Self::new(move |inner| Box::new(layer.layer(inner)))
    }

    /// Wrap a client.
    #[must_use]
    pub fn wrap(&self, client: BoxClient) -> BoxClient {
        (self.wrap)(client)
    }
}

impl Layer<BoxClient> for Middleware {
    type Service = BoxClient;

    fn layer(&self, inner: BoxClient) -> Self::Service {
        self.wrap(inner)
    }
}

/// Append a single header to every request.
///
/// # Errors
///
/// Returns an error if the name or value is not a valid header.
pub fn header(name: &str, value: &str) -> Result<Middleware> {
    headers([(name, value)])
}

/// Append the given headers to every request, keeping existing values.
///
/// # Errors
///
/// Returns an error if a name or value is not a valid header.
pub fn headers<I, K, V>(pairs: I) -> Result<Middleware>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    HeadersLayer::try_from_pairs(pairs).map(Middleware::from_layer)
}

/// Rewrite scheme and authority of every request from `base_url`.
///
/// # Panics
///
/// Panics immediately if `base_url` cannot be parsed or has no host, so that a
/// misconfigured target is reported before any request is sent. Use
/// [`BaseUrlLayer::try_new`] to handle the error instead.
#[must_use]
pub fn base_url(base_url: &str) -> Middleware {
    Middleware::from_layer(BaseUrlLayer::new(base_url))
}

/// Convert panics raised further down the chain into errors.
#[must_use]
pub fn recover() -> Middleware {
    Middleware::from_layer(RecoverLayer::new())
}

/// Retry up to `max_attempts` times until `is_good` accepts the outcome.
#[must_use]
pub fn backoff(max_attempts: u32, base_delay: Duration, is_good: GoodRequestFn) -> Middleware {
    Middleware::from_layer(BackoffLayer::new(max_attempts, base_delay, is_good))
}

/// Log every request at info level.
#[must_use]
pub fn logging() -> Middleware {
    Middleware::from_layer(LoggingLayer::new())
}
