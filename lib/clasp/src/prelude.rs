//! Prelude module for convenient imports.
//!
//! ```
//! use clasp::prelude::*;
//! ```

pub use crate::middleware::{self, status_in};
pub use crate::{
    BoxClient, ClientBuilder, ClientConfig, Error, HttpClient, Method, Middleware, Request,
    RequestBuilder, Response, Result, Uri, chain, client_fn,
};
