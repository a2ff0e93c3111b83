//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use clasp_core::prelude::*;
//! ```

pub use crate::{
    BoxClient, Error, HttpClient, Method, Request, RequestBuilder, Response, Result, Uri,
    client_fn,
};
