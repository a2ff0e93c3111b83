//! Base URL middleware.
//!
//! Points every request at a fixed scheme and host while keeping its path and
//! query. The base URL is parsed once, when the layer is built.

use http::uri::{Authority, PathAndQuery, Scheme};
use tower::Layer;
use url::Url;

use crate::{Error, HttpClient, Request, Response, Result, Uri};

/// Layer that rewrites the scheme and authority of requests.
///
/// # Example
///
/// ```
/// use clasp::middleware::BaseUrlLayer;
///
/// let layer = BaseUrlLayer::try_new("https://api.example.com:8443")?;
/// assert_eq!(layer.authority().as_str(), "api.example.com:8443");
/// # Ok::<(), clasp::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct BaseUrlLayer {
    scheme: Scheme,
    authority: Authority,
}

impl BaseUrlLayer {
    /// Parse `base_url` into a layer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the URL does not parse and
    /// [`Error::InvalidBaseUrl`] if it has no host.
    pub fn try_new(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url)?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidBaseUrl(format!("{base_url}: missing host")))?;
        // `Url` drops a port equal to the scheme default; keep it as written.
        let port = url.port().or_else(|| {
            base_url
                .parse::<Uri>()
                .ok()
                .and_then(|uri| uri.authority().and_then(Authority::port_u16))
        });
        let authority = match port {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let scheme = url
            .scheme()
            .parse::<Scheme>()
            .map_err(|err| Error::InvalidBaseUrl(format!("{base_url}: {err}")))?;
        let authority = authority
            .parse::<Authority>()
            .map_err(|err| Error::InvalidBaseUrl(format!("{base_url}: {err}")))?;

        Ok(Self { scheme, authority })
    }

    /// Parse `base_url` into a layer, failing fast.
    ///
    /// # Panics
    ///
    /// Panics if `base_url` is invalid; see [`BaseUrlLayer::try_new`].
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::try_new(base_url).unwrap_or_else(|err| panic!("invalid base URL `{base_url}`: {err}"))
    }

    /// Scheme applied to requests.
    #[must_use]
    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Authority (host and optional port) applied to requests.
    #[must_use]
    pub fn authority(&self) -> &Authority {
        &self.authority
    }
}

impl<C> Layer<C> for BaseUrlLayer {
    type Service = BaseUrl<C>;

    fn layer(&self, inner: C) -> Self::Service {
        BaseUrl {
            inner,
            scheme: self.scheme.clone(),
            authority: self.authority.clone(),
        }
    }
}

/// Client that rewrites the scheme and authority of requests.
#[derive(Debug, Clone)]
pub struct BaseUrl<C> {
    inner: C,
    scheme: Scheme,
    authority: Authority,
}

impl<C> BaseUrl<C> {
    fn rebase(&self, uri: &Uri) -> Result<Uri> {
        let mut parts = uri.clone().into_parts();
        parts.scheme = Some(self.scheme.clone());
        parts.authority = Some(self.authority.clone());
        if parts.path_and_query.is_none() {
            parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }

        Uri::from_parts(parts).map_err(|err| Error::invalid_request(err.to_string()))
    }
}

impl<C: HttpClient> HttpClient for BaseUrl<C> {
    fn execute(&self, mut request: Request) -> Result<Response> {
        *request.uri_mut() = self.rebase(request.uri())?;
        self.inner.execute(request)
    }
}
