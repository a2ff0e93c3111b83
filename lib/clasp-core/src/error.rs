//! Error types for clasp.

use derive_more::{Display, Error, From};

/// Main error type for clasp operations.
///
/// The messages of [`Error::RecoveredPanic`], [`Error::RetriesExhausted`] and
/// [`Error::NoMatch`] are part of the public contract and stay stable.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// A panic raised inside the chain, converted by the recover middleware.
    #[display("recovered panic: {_0}")]
    #[from(skip)]
    RecoveredPanic(#[error(not(source))] String),

    /// Every attempt of the backoff middleware was rejected.
    #[display("request failed after {attempts} retries.")]
    #[from(skip)]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
    },

    /// No registered expectation of a mock client matched the request.
    #[display("No suitable request found")]
    #[from(skip)]
    NoMatch,

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// The URL parsed but cannot be used as a base target.
    #[display("invalid base URL: {_0}")]
    #[from(skip)]
    InvalidBaseUrl(#[error(not(source))] String),

    /// Invalid header name or value.
    #[display("invalid header: {_0}")]
    #[from(skip)]
    InvalidHeader(#[error(not(source))] String),

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// Network/connection errors reported by a transport.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// The async runtime driving a transport could not be started.
    #[display("runtime error: {_0}")]
    #[from(skip)]
    Runtime(std::io::Error),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a recovered panic error from the panic message.
    #[must_use]
    pub fn recovered_panic(message: impl Into<String>) -> Self {
        Self::RecoveredPanic(message.into())
    }

    /// Create an invalid header error.
    #[must_use]
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Returns `true` if no mock expectation matched.
    #[must_use]
    pub const fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch)
    }

    /// Returns `true` if the backoff middleware gave up.
    #[must_use]
    pub const fn is_retries_exhausted(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }

    /// Returns `true` if this error came from a recovered panic.
    #[must_use]
    pub const fn is_recovered_panic(&self) -> bool {
        matches!(self, Self::RecoveredPanic(_))
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
