//! The mock client.

use tracing::{debug, warn};

use clasp_core::{Error, HttpClient, Request, Response, Result};

use crate::promise::{Promise, PromiseBuilder};

/// Client answering requests from registered promises.
///
/// Promises are only added through a [`PromiseBuilder`], which borrows the
/// client mutably, so registration never overlaps with request execution.
#[derive(Debug, Default)]
pub struct MockClient {
    promises: Vec<Promise>,
}

impl MockClient {
    /// Create a client with no promise.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a promise with no constraint.
    ///
    /// A promise finalized without any checker matches every request.
    pub fn request(&mut self) -> PromiseBuilder<'_> {
        PromiseBuilder::new(self)
    }

    /// Start a promise matching `GET path`.
    pub fn get(&mut self, path: impl Into<String>) -> PromiseBuilder<'_> {
        self.request().get(path)
    }

    /// Start a promise matching `POST path`.
    pub fn post(&mut self, path: impl Into<String>) -> PromiseBuilder<'_> {
        self.request().post(path)
    }

    /// Number of registered promises.
    #[must_use]
    pub fn len(&self) -> usize {
        self.promises.len()
    }

    /// Whether no promise is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.promises.is_empty()
    }

    /// Registered promises, in priority order.
    #[must_use]
    pub fn promises(&self) -> &[Promise] {
        &self.promises
    }

    pub(crate) fn push(&mut self, promise: Promise) {
        self.promises.push(promise);
    }
}

impl HttpClient for MockClient {
    fn execute(&self, mut request: Request) -> Result<Response> {
        let body = request.take_body();

        for (index, promise) in self.promises.iter().enumerate() {
            let candidate = request.clone().with_body(body.clone());
            if let Some(response) = promise.check(&candidate) {
                debug!(
                    promise = index,
                    method = %request.method(),
                    path = request.target(),
                    status = response.status(),
                    "mock request matched"
                );
                return Ok(response);
            }
        }

        warn!(
            method = %request.method(),
            path = request.target(),
            promises = self.promises.len(),
            "no mock promise matched"
        );
        Err(Error::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use assert2::{check, let_assert};
    use clasp_core::{Method, Uri};

    use super::*;

    fn request(method: Method, target: &'static str) -> Request {
        Request::builder(method, Uri::from_static(target)).build()
    }

    fn with_payload(method: Method, target: &'static str, body: &'static str) -> Request {
        Request::builder(method, Uri::from_static(target))
            .body(body)
            .build()
    }

    fn text(response: Response) -> String {
        let mut text = String::new();
        response
            .into_reader()
            .read_to_string(&mut text)
            .expect("readable body");
        text
    }

    #[test]
    fn returns_matching_response() {
        let mut client = MockClient::new();
        client.get("/path").will_return(200, "response");

        let response = client.execute(request(Method::GET, "/path")).expect("response");
        check!(response.status() == 200);
        check!(text(response) == "response");
    }

    #[test]
    fn first_registered_promise_wins() {
        let mut client = MockClient::new();
        client.get("/path").will_return(200, "response");
        client.get("/path").will_return(200, "response_2");

        let response = client.execute(request(Method::GET, "/path")).expect("response");
        check!(text(response) == "response");
    }

    #[test]
    fn method_distinguishes_promises() {
        let mut client = MockClient::new();
        client.get("/path").will_return(200, "response");
        client.post("/path").will_return(200, "response_2");

        let response = client.execute(request(Method::POST, "/path")).expect("response");
        check!(text(response) == "response_2");
    }

    #[test]
    fn body_distinguishes_promises() {
        let mut client = MockClient::new();
        client
            .post("/path")
            .with_body("request_1")
            .will_return(200, "response");
        client
            .post("/path")
            .with_body("request_2")
            .will_return(200, "response_2");

        let response = client
            .execute(with_payload(Method::POST, "/path", "request_2"))
            .expect("response");
        check!(text(response) == "response_2");
    }

    #[test]
    fn wrong_path_is_no_match() {
        let mut client = MockClient::new();
        client.get("/").will_return(200, "response");

        let_assert!(Err(err) = client.execute(request(Method::GET, "/path")));
        check!(err.is_no_match());
        insta::assert_snapshot!(err, @"No suitable request found");
    }

    #[test]
    fn wrong_body_is_no_match() {
        let mut client = MockClient::new();
        client.post("/").with_body("request").will_return(200, "response");

        let_assert!(Err(Error::NoMatch) = client.execute(with_payload(Method::POST, "/", "request_")));
    }

    #[test]
    fn empty_client_is_no_match() {
        let client = MockClient::new();
        check!(client.is_empty());
        let_assert!(Err(Error::NoMatch) = client.execute(request(Method::GET, "/")));
    }

    #[test]
    fn query_is_part_of_the_path() {
        let mut client = MockClient::new();
        client.get("/path?param=value").will_return(200, "response");

        check!(client.execute(request(Method::GET, "/path?param=value")).is_ok());
        let_assert!(Err(Error::NoMatch) = client.execute(request(Method::GET, "/path")));
        let_assert!(Err(Error::NoMatch) = client.execute(request(Method::GET, "/path/")));
    }

    #[test]
    fn unconstrained_promise_matches_anything() {
        let mut client = MockClient::new();
        client.request().will_return(200, "response");

        let response = client
            .execute(with_payload(Method::DELETE, "/anything?at=all", "payload"))
            .expect("response");
        check!(text(response) == "response");
    }

    #[test]
    fn every_promise_sees_the_full_body() {
        let mut client = MockClient::new();
        client
            .post("/path")
            .with_checker(|request| request.body().is_some_and(|body| body.len() > 100))
            .will_return(413, "");
        client.post("/path").with_body("small").will_return(200, "ok");

        let response = client
            .execute(with_payload(Method::POST, "/path", "small"))
            .expect("response");
        check!(response.status() == 200);
    }

    #[test]
    fn repeated_matches_are_independently_readable() {
        let mut client = MockClient::new();
        client.get("/path").will_return(200, "response");

        for _ in 0..2 {
            let response = client.execute(request(Method::GET, "/path")).expect("response");
            check!(text(response) == "response");
        }
    }

    #[test]
    fn builders_return_the_client_for_chaining() {
        let mut client = MockClient::new();
        client
            .get("/a")
            .will_return(200, "a")
            .get("/b")
            .will_return(200, "b");

        check!(client.len() == 2);
        check!(client.promises().len() == 2);
    }
}
