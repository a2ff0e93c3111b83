//! Middleware composition.
//!
//! [`chain`] folds an ordered list of [`Middleware`] over a base client;
//! [`ClientBuilder`] is the builder form of the same fold.

use std::time::Duration;

use tower::Layer;

use crate::middleware::{
    self, BackoffLayer, BaseUrlLayer, GoodRequestFn, HeadersLayer, LoggingLayer, Middleware,
    RecoverLayer,
};
use crate::{BoxClient, HttpClient, Result};

/// Wrap `client` with every middleware, in order.
///
/// Composing `[m1, m2, m3]` yields `m3(m2(m1(client)))`: the **last**
/// middleware is the outermost and runs first, the first runs last, right
/// before `client`.
///
/// ```
/// use clasp::{HttpClient, Method, Request, Response, Uri, chain, client_fn, middleware};
///
/// let base = client_fn(|request: Request| {
///     Ok(Response::with_status(200, request.uri().to_string()))
/// });
/// let client = chain(base, [middleware::base_url("http://example.com")]);
///
/// let request = Request::builder(Method::GET, Uri::from_static("/")).build();
/// assert_eq!(client.execute(request).unwrap().text().unwrap(), "http://example.com/");
/// ```
pub fn chain<C>(client: C, middlewares: impl IntoIterator<Item = Middleware>) -> BoxClient
where
    C: HttpClient + 'static,
{
    middlewares
        .into_iter()
        .fold(Box::new(client) as BoxClient, |client, middleware| {
            middleware.wrap(client)
        })
}

/// Builder composing middleware around a base client.
///
/// Middleware is applied in the order it is added, so the last one added is
/// the outermost and processes requests first.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use clasp::{ClientBuilder, middleware::status_in};
///
/// let client = ClientBuilder::new(transport)
///     .with_base_url("https://api.example.com")?
///     .with_header("Accept", "application/json")?
///     .with_backoff(3, Duration::from_millis(100), status_in([200]))
///     .with_recover()
///     .build();
/// ```
pub struct ClientBuilder<C> {
    client: C,
    middlewares: Vec<Middleware>,
}

impl<C> std::fmt::Debug for ClientBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("middlewares_count", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}

impl<C: HttpClient + 'static> ClientBuilder<C> {
    /// Start from a base client.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            middlewares: Vec::new(),
        }
    }

    // ========================================================================
    // Generic Middleware API
    // ========================================================================

    /// Add a middleware.
    #[must_use]
    pub fn with(mut self, middleware: Middleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Add a Tower layer.
    #[must_use]
    pub fn layer<L>(self, layer: L) -> Self
    where
        L: Layer<BoxClient> + Send + Sync + 'static,
        L::Service: HttpClient + 'static,
    {
        self.with(Middleware::from_layer(layer))
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Append a header to every request.
    pub fn with_header(self, name: &str, value: &str) -> Result<Self> {
        Ok(self.with(middleware::header(name, value)?))
    }

    /// Append headers to every request.
    pub fn with_headers<I, K, V>(self, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Ok(self.layer(HeadersLayer::try_from_pairs(pairs)?))
    }

    /// Point every request at `base_url`.
    pub fn with_base_url(self, base_url: &str) -> Result<Self> {
        Ok(self.layer(BaseUrlLayer::try_new(base_url)?))
    }

    /// Retry with a growing delay until `is_good` accepts the outcome.
    #[must_use]
    pub fn with_backoff(
        self,
        max_attempts: u32,
        base_delay: Duration,
        is_good: GoodRequestFn,
    ) -> Self {
        self.layer(BackoffLayer::new(max_attempts, base_delay, is_good))
    }

    /// Convert panics from the layers added so far into errors.
    #[must_use]
    pub fn with_recover(self) -> Self {
        self.layer(RecoverLayer::new())
    }

    /// Add request/response logging.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Add debug-level logging (includes headers).
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Number of middlewares added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Whether no middleware was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Compose the client.
    #[must_use]
    pub fn build(self) -> BoxClient {
        chain(self.client, self.middlewares)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use assert2::{check, let_assert};

    use super::*;
    use crate::{Method, Request, Response, Uri, client_fn};

    type CallOrder = Arc<Mutex<Vec<&'static str>>>;

    fn recording(name: &'static str, order: &CallOrder) -> Middleware {
        let order = Arc::clone(order);
        Middleware::new(move |inner| {
            let order = Arc::clone(&order);
            Box::new(client_fn(move |request| {
                order.lock().expect("lock").push(name);
                inner.execute(request)
            }))
        })
    }

    fn ok() -> impl HttpClient {
        client_fn(|_| Ok(Response::with_status(200, "")))
    }

    fn get() -> Request {
        Request::builder(Method::GET, Uri::from_static("/")).build()
    }

    #[test]
    fn chain_runs_last_middleware_first() {
        let order = CallOrder::default();
        let client = chain(
            ok(),
            [
                recording("A", &order),
                recording("B", &order),
                recording("C", &order),
            ],
        );

        check!(client.execute(get()).is_ok());
        check!(*order.lock().expect("lock") == ["C", "B", "A"]);
    }

    #[test]
    fn chain_without_middleware_is_base() {
        let client = chain(
            client_fn(|_| Ok(Response::with_status(418, ""))),
            Vec::<Middleware>::new(),
        );
        check!(client.execute(get()).expect("response").status() == 418);
    }

    #[test]
    fn builder_matches_chain_order() {
        let order = CallOrder::default();
        let builder = ClientBuilder::new(ok())
            .with(recording("A", &order))
            .with(recording("B", &order));
        check!(builder.len() == 2);

        check!(builder.build().execute(get()).is_ok());
        check!(*order.lock().expect("lock") == ["B", "A"]);
    }

    #[test]
    fn builder_rejects_invalid_base_url() {
        let_assert!(Err(err) = ClientBuilder::new(ok()).with_base_url("not a url"));
        check!(err.to_string().starts_with("invalid URL"));
    }

    #[test]
    fn builder_recover_catches_inner_panics() {
        let client = ClientBuilder::new(client_fn(|_| panic!("transport exploded")))
            .with_logging()
            .with_recover()
            .build();

        let_assert!(Err(err) = client.execute(get()));
        check!(err.to_string() == "recovered panic: transport exploded");
    }
}
