//! Core types and traits for the clasp HTTP client chain.
//!
//! This crate provides the foundational types used by clasp:
//! - [`HttpClient`] - The one capability: execute a request, get a response
//! - [`BoxClient`] and [`client_fn`] - Type-erased and closure-backed clients
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] - HTTP response type
//! - [`Error`] and [`Result`] - Error handling
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`Method`], [`Uri`] and [`header`] - re-exported from the `http` crate

mod client;
mod error;
pub mod prelude;
mod request;
mod response;

pub use client::{BoxClient, ClientFn, HttpClient, client_fn};
pub use error::{Error, Result};
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for methods, status codes, headers and URIs
pub use http::{Method, StatusCode, Uri, header};
