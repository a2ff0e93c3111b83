//! Promises and their builder.

use std::fmt;
use std::io::{self, Read};

use bytes::Bytes;
use http::HeaderMap;

use clasp_core::{Method, Request, Response};

use crate::MockClient;

/// Predicate over an incoming request.
pub type Checker = Box<dyn Fn(&Request) -> bool + Send + Sync>;

/// A set of checkers that must all accept a request, and the response to
/// return when they do.
pub struct Promise {
    checkers: Vec<Checker>,
    response: Response,
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("checkers", &self.checkers.len())
            .field("response", &self.response)
            .finish()
    }
}

impl Promise {
    /// Create a promise.
    #[must_use]
    pub fn new(checkers: Vec<Checker>, response: Response) -> Self {
        Self { checkers, response }
    }

    /// Whether every checker accepts `request`.
    #[must_use]
    pub fn matches(&self, request: &Request) -> bool {
        self.checkers.iter().all(|checker| checker(request))
    }

    /// A copy of the canned response if `request` matches.
    ///
    /// Each copy has its own body, independent of copies handed out before.
    #[must_use]
    pub fn check(&self, request: &Request) -> Option<Response> {
        self.matches(request).then(|| self.response.clone())
    }

    /// The canned response.
    #[must_use]
    pub const fn response(&self) -> &Response {
        &self.response
    }
}

/// Accumulates checkers for one promise of a [`MockClient`].
///
/// Finalizing with [`will_return`](Self::will_return) or
/// [`will_return_response`](Self::will_return_response) consumes the builder
/// and registers the promise.
pub struct PromiseBuilder<'a> {
    client: &'a mut MockClient,
    checkers: Vec<Checker>,
}

impl fmt::Debug for PromiseBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromiseBuilder")
            .field("checkers", &self.checkers.len())
            .finish_non_exhaustive()
    }
}

impl<'a> PromiseBuilder<'a> {
    /// Start a promise for `client`.
    #[must_use]
    pub fn new(client: &'a mut MockClient) -> Self {
        Self {
            client,
            checkers: Vec::new(),
        }
    }

    /// Number of checkers added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    /// Whether no checker was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    /// Add a custom checker.
    #[must_use]
    pub fn with_checker<F>(mut self, checker: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.checkers.push(Box::new(checker));
        self
    }

    /// Require the request method.
    ///
    /// Any method is accepted, including extension methods built with
    /// [`Method::from_bytes`].
    #[must_use]
    pub fn with_method(self, method: Method) -> Self {
        self.with_checker(move |request| *request.method() == method)
    }

    /// Require the request target, path and query, to equal `path` exactly.
    ///
    /// No normalization happens: `/path`, `/path/` and `/path?a=1` are three
    /// different targets.
    #[must_use]
    pub fn with_path(self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.with_checker(move |request| request.target() == path)
    }

    /// Require one of the values of header `name` to equal `value`.
    #[must_use]
    pub fn with_header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let (name, value) = (name.into(), value.into());
        self.with_checker(move |request| request.header_values(&name).any(|v| v == value))
    }

    /// Require the request body to equal `body` byte for byte.
    ///
    /// A request without body is compared as an empty body.
    #[must_use]
    pub fn with_body(self, body: impl Into<Bytes>) -> Self {
        let expected = body.into();
        self.with_checker(move |request| {
            request.body().map_or(&[][..], |body| body.as_ref()) == expected.as_ref()
        })
    }

    /// Require the request body to equal the content of `reader`.
    ///
    /// # Errors
    ///
    /// Returns the error raised while reading `reader`.
    pub fn with_body_reader(self, mut reader: impl Read) -> io::Result<Self> {
        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;
        Ok(self.with_body(body))
    }

    /// Shorthand for `with_method(Method::GET).with_path(path)`.
    #[must_use]
    pub fn get(self, path: impl Into<String>) -> Self {
        self.with_method(Method::GET).with_path(path)
    }

    /// Shorthand for `with_method(Method::POST).with_path(path)`.
    #[must_use]
    pub fn post(self, path: impl Into<String>) -> Self {
        self.with_method(Method::POST).with_path(path)
    }

    /// Register the promise with a response built from `status` and `body`.
    pub fn will_return(self, status: u16, body: impl Into<Bytes>) -> &'a mut MockClient {
        self.will_return_response(Response::new(status, HeaderMap::new(), body))
    }

    /// Register the promise with a fully formed response.
    pub fn will_return_response(self, response: Response) -> &'a mut MockClient {
        let Self { client, checkers } = self;
        client.push(Promise::new(checkers, response));
        client
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use clasp_core::Uri;

    use super::*;

    fn request(method: Method, target: &'static str) -> Request {
        Request::builder(method, Uri::from_static(target)).build()
    }

    fn with_payload(method: Method, target: &'static str, body: &'static str) -> Request {
        Request::builder(method, Uri::from_static(target))
            .body(body)
            .build()
    }

    /// Checks `requests` against a promise built from the builder's checkers.
    fn assert_checkers(builder: PromiseBuilder<'_>, valid: &[Request], invalid: &[Request]) {
        let promise = Promise::new(builder.checkers, Response::with_status(200, ""));
        for request in valid {
            check!(promise.matches(request), "expected match: {request:?}");
        }
        for request in invalid {
            check!(!promise.matches(request), "expected no match: {request:?}");
        }
    }

    #[test]
    fn new_builder_has_no_checker() {
        let mut client = MockClient::new();
        check!(client.request().is_empty());
    }

    #[test]
    fn with_method() {
        let mut client = MockClient::new();
        assert_checkers(
            client.request().with_method(Method::PUT),
            &[
                request(Method::PUT, "/"),
                request(Method::PUT, "/path/"),
                with_payload(Method::PUT, "/path/", "something"),
            ],
            &[request(Method::GET, "/"), request(Method::POST, "/")],
        );
    }

    #[test]
    fn with_extension_method() {
        let purge = Method::from_bytes(b"PURGE").expect("valid method");
        let mut client = MockClient::new();
        assert_checkers(
            client.request().with_method(purge.clone()),
            &[request(purge, "/cache/key")],
            &[
                request(Method::GET, "/cache/key"),
                request(Method::DELETE, "/cache/key"),
            ],
        );
    }

    #[test]
    fn get() {
        let mut client = MockClient::new();
        assert_checkers(
            client.request().get("/some/path"),
            &[
                request(Method::GET, "/some/path"),
                with_payload(Method::GET, "/some/path", "something"),
            ],
            &[
                request(Method::POST, "/some/path"),
                request(Method::GET, "/some/path/"),
            ],
        );
    }

    #[test]
    fn post() {
        let mut client = MockClient::new();
        assert_checkers(
            client.request().post("/some/path"),
            &[
                request(Method::POST, "/some/path"),
                with_payload(Method::POST, "/some/path", "something"),
            ],
            &[
                request(Method::GET, "/some/path"),
                request(Method::POST, "/some/path/"),
            ],
        );
    }

    #[test]
    fn with_path_is_exact() {
        let mut client = MockClient::new();
        assert_checkers(
            client.request().with_path("/some/path"),
            &[
                request(Method::POST, "/some/path"),
                request(Method::GET, "/some/path"),
                request(Method::GET, "http://example.com/some/path"),
            ],
            &[
                request(Method::GET, "/some/path/"),
                request(Method::GET, "/some/path?query=1"),
                request(Method::GET, "/"),
            ],
        );
    }

    #[test]
    fn with_path_keeps_query_order() {
        let mut client = MockClient::new();
        assert_checkers(
            client.request().with_path("/search?a=1&b=2"),
            &[request(Method::GET, "/search?a=1&b=2")],
            &[request(Method::GET, "/search?b=2&a=1")],
        );
    }

    #[test]
    fn with_header() {
        let exact = Request::builder(Method::POST, Uri::from_static("/some/path"))
            .try_header("X-Foo", "123")
            .expect("valid header")
            .build();
        let among_others = Request::builder(Method::POST, Uri::from_static("/some/path"))
            .try_header("X-Foo", "abc")
            .and_then(|builder| builder.try_header("X-Foo", "123"))
            .expect("valid header")
            .build();
        let different = Request::builder(Method::POST, Uri::from_static("/some/path"))
            .try_header("X-Foo", "1234")
            .expect("valid header")
            .build();

        let mut client = MockClient::new();
        assert_checkers(
            client.request().with_header("X-Foo", "123"),
            &[exact, among_others],
            &[different, request(Method::POST, "/some/path")],
        );
    }

    #[test]
    fn with_body() {
        let mut client = MockClient::new();
        assert_checkers(
            client.request().with_body("some body"),
            &[
                with_payload(Method::POST, "/some/path", "some body"),
                with_payload(Method::PUT, "/some/path", "some body"),
            ],
            &[
                request(Method::POST, "/some/path"),
                with_payload(Method::PUT, "/some/path", "wrong body"),
            ],
        );
    }

    #[test]
    fn empty_body_matches_missing_body() {
        let mut client = MockClient::new();
        assert_checkers(
            client.request().with_body(""),
            &[request(Method::GET, "/"), with_payload(Method::POST, "/", "")],
            &[with_payload(Method::POST, "/", " ")],
        );
    }

    #[test]
    fn with_body_reader() {
        let mut client = MockClient::new();
        let builder = client
            .request()
            .with_body_reader("some body".as_bytes())
            .expect("readable");
        assert_checkers(
            builder,
            &[with_payload(Method::POST, "/some/path", "some body")],
            &[
                request(Method::POST, "/some/path"),
                with_payload(Method::PUT, "/some/path", "wrong body"),
            ],
        );
    }

    #[test]
    fn will_return_registers_promise() {
        let mut client = MockClient::new();
        client
            .request()
            .with_method(Method::GET)
            .will_return(200, "some response");

        check!(client.len() == 1);
        let promise = &client.promises()[0];
        check!(promise.response().status() == 200);
        check!(promise.response().body() == "some response");
        check!(promise.matches(&request(Method::GET, "/")));
    }

    #[test]
    fn will_return_response_keeps_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", http::HeaderValue::from_static("application/json"));
        let response = Response::new(202, headers, "{}");

        let mut client = MockClient::new();
        client.request().will_return_response(response);

        let registered = client.promises()[0].response();
        check!(registered.status() == 202);
        check!(registered.header("content-type") == Some("application/json"));
    }

    #[test]
    fn check_hands_out_fresh_copies() {
        let promise = Promise::new(Vec::new(), Response::with_status(200, "body"));
        let first = promise.check(&request(Method::GET, "/")).expect("match");
        let second = promise.check(&request(Method::GET, "/")).expect("match");

        check!(first.into_body() == "body");
        check!(second.into_body() == "body");
    }
}
