//! Composable middleware chain for blocking HTTP clients.
//!
//! A client is anything implementing [`HttpClient`]; a [`Middleware`] wraps a
//! client into another one. [`chain`] (or [`ClientBuilder`]) composes an
//! ordered list of middleware around a base client, the last one supplied
//! running first.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use clasp::middleware::{self, status_in};
//! use clasp::{HttpClient, Method, Request, Response, Uri, chain, client_fn};
//!
//! let transport = client_fn(|request: Request| {
//!     let agent = request.header("user-agent").unwrap_or_default().to_string();
//!     Ok(Response::with_status(200, format!("{} {agent}", request.uri())))
//! });
//!
//! let client = chain(
//!     transport,
//!     [
//!         middleware::base_url("https://api.example.com"),
//!         middleware::header("User-Agent", "clasp").unwrap(),
//!         middleware::backoff(3, Duration::from_millis(10), status_in([200])),
//!         middleware::recover(),
//!     ],
//! );
//!
//! let request = Request::builder(Method::GET, Uri::from_static("/users/42")).build();
//! let response = client.execute(request).unwrap();
//! assert_eq!(response.text().unwrap(), "https://api.example.com/users/42 clasp");
//! ```

mod client;
mod config;
pub mod middleware;
pub mod prelude;
mod service;

pub use client::{ClientBuilder, chain};
pub use config::{BackoffConfig, ClientConfig, ClientConfigBuilder};
pub use middleware::Middleware;
pub use service::{ClientService, ServiceClient};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use clasp_core::{
    BoxClient, ClientFn, Error, HttpClient, Method, Request, RequestBuilder, Response, Result,
    client_fn,
};

// Re-export http types for status codes, headers and URIs
pub use clasp_core::{StatusCode, Uri, header};
