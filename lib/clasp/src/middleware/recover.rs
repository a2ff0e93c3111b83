//! Panic recovery middleware.
//!
//! Runs the wrapped client under [`std::panic::catch_unwind`] and turns a
//! panic into [`Error::RecoveredPanic`]. This is the only place in the chain
//! where a panic is caught; without this layer it reaches the caller.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tower::Layer;
use tracing::error;

use crate::{Error, HttpClient, Request, Response, Result};

/// Layer that converts panics into errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoverLayer;

impl RecoverLayer {
    /// Create a new recover layer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<C> Layer<C> for RecoverLayer {
    type Service = Recover<C>;

    fn layer(&self, inner: C) -> Self::Service {
        Recover { inner }
    }
}

/// Client that converts panics into errors.
#[derive(Debug, Clone)]
pub struct Recover<C> {
    inner: C,
}

impl<C: HttpClient> HttpClient for Recover<C> {
    fn execute(&self, request: Request) -> Result<Response> {
        // Nothing captured by the closure is read after an unwind.
        panic::catch_unwind(AssertUnwindSafe(|| self.inner.execute(request))).unwrap_or_else(
            |payload| {
                let message = panic_message(&*payload);
                error!(panic = %message, "recovered panic in client chain");
                Err(Error::recovered_panic(message))
            },
        )
    }
}

/// Render a panic payload the way `panic!` formatted it.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
