//! Request/response logging middleware.
//!
//! This middleware logs HTTP requests and responses using the `tracing` crate.

use std::time::Instant;

use serde::Deserialize;
use tower::Layer;
use tracing::{Level, debug, info, span, warn};

use crate::{HttpClient, Request, Response, Result};

/// Layer that adds request/response logging.
///
/// # Example
///
/// ```
/// use clasp::middleware::LoggingLayer;
///
/// let layer = LoggingLayer::debug();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Log at debug level (request/response details).
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer that logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self::with_level(LogLevel::Debug)
    }

    /// Create a logging layer with the given level.
    #[must_use]
    pub const fn with_level(level: LogLevel) -> Self {
        Self { level }
    }
}

impl<C> Layer<C> for LoggingLayer {
    type Service = Logging<C>;

    fn layer(&self, inner: C) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Client that logs requests and responses.
#[derive(Debug, Clone)]
pub struct Logging<C> {
    inner: C,
    level: LogLevel,
}

impl<C> Logging<C> {
    /// Create a new logging client wrapping the given client.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            level: LogLevel::Info,
        }
    }
}

impl<C: HttpClient> HttpClient for Logging<C> {
    fn execute(&self, request: Request) -> Result<Response> {
        let method = request.method().clone();
        let uri = request.uri().to_string();

        let span = span!(Level::INFO, "http_request", %method, %uri);
        let _entered = span.enter();

        let start = Instant::now();
        match self.level {
            LogLevel::Debug => {
                debug!(
                    method = %method,
                    uri = %uri,
                    headers = ?request.headers(),
                    "sending request"
                );
            }
            LogLevel::Info => {
                info!(method = %method, uri = %uri, "sending request");
            }
        }

        let result = self.inner.execute(request);

        // Saturating conversion to u64 (truncates after ~584 million years)
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(response) => {
                let status = response.status();
                if response.is_success() {
                    info!(status, elapsed_ms, "request completed");
                } else {
                    warn!(status, elapsed_ms, "request failed with HTTP error");
                }
            }
            Err(err) => {
                warn!(error = %err, elapsed_ms, "request failed");
            }
        }

        result
    }
}
