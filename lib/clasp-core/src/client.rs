//! HTTP client traits.
//!
//! - [`HttpClient`] - Blocking request execution, the one capability every
//!   transport, middleware and mock implements
//! - [`BoxClient`] - Type-erased client, the currency of middleware composition
//! - [`client_fn`] - Turn a closure into a client

use std::fmt;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Core HTTP client trait.
///
/// Sends one [`Request`] and returns one [`Response`] or an error. Calls block
/// the current thread until the response is available.
///
/// # Example
///
/// ```
/// use clasp_core::{HttpClient, Method, Request, Response, Result};
///
/// struct Teapot;
///
/// impl HttpClient for Teapot {
///     fn execute(&self, _request: Request) -> Result<Response> {
///         Ok(Response::with_status(418, "I'm a teapot"))
///     }
/// }
///
/// let request = Request::builder(Method::GET, http::Uri::from_static("/")).build();
/// assert_eq!(Teapot.execute(request).unwrap().status(), 418);
/// ```
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason.
    fn execute(&self, request: Request) -> Result<Response>;
}

/// A type-erased [`HttpClient`].
pub type BoxClient = Box<dyn HttpClient>;

impl<C: HttpClient + ?Sized> HttpClient for Box<C> {
    fn execute(&self, request: Request) -> Result<Response> {
        (**self).execute(request)
    }
}

impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    fn execute(&self, request: Request) -> Result<Response> {
        (**self).execute(request)
    }
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    fn execute(&self, request: Request) -> Result<Response> {
        (**self).execute(request)
    }
}

/// A client backed by a closure. See [`client_fn`].
#[derive(Clone)]
pub struct ClientFn<F> {
    f: F,
}

impl<F> fmt::Debug for ClientFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientFn").finish_non_exhaustive()
    }
}

impl<F> HttpClient for ClientFn<F>
where
    F: Fn(Request) -> Result<Response> + Send + Sync,
{
    fn execute(&self, request: Request) -> Result<Response> {
        (self.f)(request)
    }
}

/// Create a client from a closure.
///
/// Handy for middleware written as plain functions and for test doubles.
///
/// ```
/// use clasp_core::{HttpClient, Method, Request, Response, client_fn};
///
/// let echo = client_fn(|request: Request| {
///     Ok(Response::with_status(200, request.target().to_string()))
/// });
///
/// let request = Request::builder(Method::GET, http::Uri::from_static("/ping")).build();
/// assert_eq!(echo.execute(request).unwrap().text().unwrap(), "/ping");
/// ```
pub fn client_fn<F>(f: F) -> ClientFn<F>
where
    F: Fn(Request) -> Result<Response> + Send + Sync,
{
    ClientFn { f }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert2::check;
    use http::Uri;

    use super::*;
    use crate::{Error, Method};

    fn request() -> Request {
        Request::builder(Method::GET, Uri::from_static("/")).build()
    }

    fn succeeds(client: impl HttpClient) -> bool {
        client.execute(request()).is_ok()
    }

    #[test]
    fn client_fn_delegates_to_closure() {
        let calls = AtomicUsize::new(0);
        let client = client_fn(|_request| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Response::with_status(204, ""))
        });

        let response = client.execute(request()).expect("response");
        check!(response.status() == 204);
        check!(calls.load(Ordering::SeqCst) == 1);
    }

    #[test]
    fn boxed_and_shared_clients_delegate() {
        let boxed: BoxClient = Box::new(client_fn(|_| Err(Error::NoMatch)));
        check!(boxed.execute(request()).is_err());

        let shared = Arc::new(client_fn(|_| Ok(Response::with_status(200, "ok"))));
        check!(shared.execute(request()).is_ok());
        check!(succeeds(&*shared));
    }
}
