//! Header injection middleware.
//!
//! This middleware appends a fixed set of headers to all outgoing requests.
//! Values are added next to any value already present under the same name;
//! nothing is overwritten.

use std::sync::Arc;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use tower::Layer;

use crate::{Error, HttpClient, Request, Response, Result};

/// Layer that appends headers to requests.
///
/// # Example
///
/// ```
/// use clasp::middleware::HeadersLayer;
///
/// let layer = HeadersLayer::try_from_pairs([("X-Api-Key", "secret"), ("Accept", "text/plain")])?;
/// # Ok::<(), clasp::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct HeadersLayer {
    headers: Arc<HeaderMap>,
}

impl HeadersLayer {
    /// Create a headers layer from a header map.
    #[must_use]
    pub fn new(headers: HeaderMap) -> Self {
        Self {
            headers: Arc::new(headers),
        }
    }

    /// Create a headers layer from string pairs, validating each name and value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] on the first invalid name or value.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            let (name, value) = (name.as_ref(), value.as_ref());
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| Error::invalid_header(format!("{name}: {err}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|err| Error::invalid_header(format!("{name}: {err}")))?;
            headers.append(header_name, header_value);
        }
        Ok(Self::new(headers))
    }
}

impl<C> Layer<C> for HeadersLayer {
    type Service = Headers<C>;

    fn layer(&self, inner: C) -> Self::Service {
        Headers {
            inner,
            headers: Arc::clone(&self.headers),
        }
    }
}

/// Client that appends headers to requests.
#[derive(Debug, Clone)]
pub struct Headers<C> {
    inner: C,
    headers: Arc<HeaderMap>,
}

impl<C: HttpClient> HttpClient for Headers<C> {
    fn execute(&self, mut request: Request) -> Result<Response> {
        let target = request.headers_mut();
        for (name, value) in self.headers.iter() {
            target.append(name.clone(), value.clone());
        }

        self.inner.execute(request)
    }
}
