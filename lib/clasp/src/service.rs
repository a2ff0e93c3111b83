//! Bridges between [`HttpClient`] and Tower [`Service`].
//!
//! [`ClientService`] exposes a blocking client to Tower-based code, and
//! [`ServiceClient`] drives an async Tower service as a blocking client on a
//! private single-threaded runtime.

use std::fmt;
use std::future::{Ready, ready};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use tower::ServiceExt;
use tower_service::Service;

use crate::{Error, HttpClient, Request, Response, Result};

/// Tower service backed by a blocking client.
///
/// The returned future is already resolved: the client runs to completion
/// inside [`Service::call`].
#[derive(Debug)]
pub struct ClientService<C> {
    client: Arc<C>,
}

impl<C> ClientService<C> {
    /// Wrap a client.
    pub fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// The wrapped client.
    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C> Clone for ClientService<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: HttpClient> Service<Request> for ClientService<C> {
    type Response = Response;
    type Error = Error;
    type Future = Ready<Result<Response>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        ready(self.client.execute(request))
    }
}

/// Blocking client backed by a Tower service.
///
/// Every call clones the service and drives it with `oneshot` on a
/// current-thread Tokio runtime owned by this client. The service is kept
/// behind a lock, so it only needs to be `Send`.
///
/// # Panics
///
/// [`HttpClient::execute`] panics when called from within an async context,
/// as Tokio cannot block a thread that is driving a runtime.
pub struct ServiceClient<S> {
    service: Mutex<S>,
    runtime: tokio::runtime::Runtime,
}

impl<S> fmt::Debug for ServiceClient<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient").finish_non_exhaustive()
    }
}

impl<S> ServiceClient<S> {
    /// Wrap a service.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Runtime`] if the runtime cannot be created.
    pub fn new(service: S) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;
        Ok(Self {
            service: Mutex::new(service),
            runtime,
        })
    }
}

impl<S> HttpClient for ServiceClient<S>
where
    S: Service<Request, Response = Response, Error = Error> + Clone + Send,
{
    fn execute(&self, request: Request) -> Result<Response> {
        let service = self
            .service
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        self.runtime.block_on(service.oneshot(request))
    }
}
