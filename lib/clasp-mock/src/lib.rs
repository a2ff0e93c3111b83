//! Declarative mock client for testing code built on clasp.
//!
//! A [`MockClient`] holds an ordered list of [`Promise`]s. Each promise is a
//! set of checkers that must all accept a request, plus the response to
//! return. Requests are matched against promises in registration order and the
//! first match wins.
//!
//! # Example
//!
//! ```
//! use clasp_core::{HttpClient, Method, Request, Uri};
//! use clasp_mock::MockClient;
//!
//! let mut client = MockClient::new();
//! client.get("/users/42").will_return(200, r#"{"id":42}"#);
//! client
//!     .post("/users")
//!     .with_body(r#"{"name":"ada"}"#)
//!     .will_return(201, "created");
//!
//! let request = Request::builder(Method::GET, Uri::from_static("/users/42")).build();
//! let response = client.execute(request).unwrap();
//! assert_eq!(response.status(), 200);
//! ```

mod client;
mod promise;

pub use client::MockClient;
pub use promise::{Checker, Promise, PromiseBuilder};
