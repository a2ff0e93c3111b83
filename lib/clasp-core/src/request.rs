//! HTTP request building.
//!
//! Use [`Request::builder`] to construct requests with headers and bodies.
//! Headers are multi-valued: adding a header never replaces a previous value.
//!
//! # Example
//!
//! ```
//! use clasp_core::{Method, Request};
//! use http::Uri;
//!
//! let request = Request::builder(Method::GET, Uri::from_static("/users?page=1"))
//!     .try_header("Accept", "application/json")
//!     .unwrap()
//!     .build();
//!
//! assert_eq!(request.target(), "/users?page=1");
//! ```

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue, IntoHeaderName};
use http::{Method, Uri};

use crate::{Error, Result};

/// An HTTP request with method, URI, headers, and optional body.
///
/// Cloning is cheap: the body is reference counted.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, uri: Uri) -> RequestBuilder {
        RequestBuilder::new(method, uri)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request URI, relative or absolute.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Mutable access to the URI.
    #[must_use]
    pub fn uri_mut(&mut self) -> &mut Uri {
        &mut self.uri
    }

    /// Request target: the path plus the literal query string, if any.
    #[must_use]
    pub fn target(&self) -> &str {
        self.uri
            .path_and_query()
            .map_or_else(|| self.uri.path(), http::uri::PathAndQuery::as_str)
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// First value of a header, if it is valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Every value of a header that is valid UTF-8, in insertion order.
    pub fn header_values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.headers
            .get_all(name)
            .into_iter()
            .filter_map(|value| value.to_str().ok())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Takes the body out of the request, leaving `None`.
    pub fn take_body(&mut self) -> Option<Bytes> {
        self.body.take()
    }

    /// Returns the request with its body replaced.
    #[must_use]
    pub fn with_body(mut self, body: Option<Bytes>) -> Self {
        self.body = body;
        self
    }

    /// Consume into (method, uri, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, Uri, HeaderMap, Option<Bytes>) {
        (self.method, self.uri, self.headers, self.body)
    }

    /// Rebuild a request from its parts.
    #[must_use]
    pub fn from_parts(method: Method, uri: Uri, headers: HeaderMap, body: Option<Bytes>) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
        }
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Appends a header value.
    #[must_use]
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Appends a header value given as strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the name or value is not a valid header.
    pub fn try_header(self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| Error::invalid_header(format!("{name}: {err}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| Error::invalid_header(format!("{name}: {err}")))?;
        Ok(self.header(name, value))
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            uri: self.uri,
            headers: self.headers,
            body: self.body,
        }
    }
}
