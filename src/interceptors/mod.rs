//! Request and response interceptor chains.
//!
//! Each client owns one [`Interceptors`] registry. Registration appends to an
//! ordered sequence; every pipeline stage takes a snapshot of its sequence at the
//! moment it runs, so a registration made before a call reaches that stage still
//! applies to the call.

use crate::types::{CanonicalResponse, RequestDescriptor};
use crate::Error;
use std::sync::{Arc, PoisonError, RwLock};

/// Transform applied to the request descriptor before dispatch.
///
/// The returned descriptor replaces the working one wholesale.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: RequestDescriptor) -> RequestDescriptor;
}

impl<F> RequestInterceptor for F
where
    F: Fn(RequestDescriptor) -> RequestDescriptor + Send + Sync,
{
    fn intercept(&self, request: RequestDescriptor) -> RequestDescriptor {
        self(request)
    }
}

/// Transform applied to a successful canonical response.
pub trait ResponseInterceptor: Send + Sync {
    fn on_response(&self, response: CanonicalResponse) -> CanonicalResponse;
}

impl<F> ResponseInterceptor for F
where
    F: Fn(CanonicalResponse) -> CanonicalResponse + Send + Sync,
{
    fn on_response(&self, response: CanonicalResponse) -> CanonicalResponse {
        self(response)
    }
}

/// Transform applied to a failure. It may rewrite or replace the error but
/// cannot turn it into a success.
pub trait ErrorInterceptor: Send + Sync {
    fn on_error(&self, error: Error) -> Error;
}

impl<F> ErrorInterceptor for F
where
    F: Fn(Error) -> Error + Send + Sync,
{
    fn on_error(&self, error: Error) -> Error {
        self(error)
    }
}

/// Ordered, append-only list.
struct Chain<T: ?Sized> {
    entries: RwLock<Vec<Arc<T>>>,
}

impl<T: ?Sized> Chain<T> {
    fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    fn push(&self, entry: Arc<T>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    fn snapshot(&self) -> Vec<Arc<T>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub struct RequestInterceptors {
    chain: Chain<dyn RequestInterceptor>,
}

impl RequestInterceptors {
    fn new() -> Self {
        Self {
            chain: Chain::new(),
        }
    }

    /// Append an interceptor; it runs after every previously registered one.
    pub fn add<I: RequestInterceptor + 'static>(&self, interceptor: I) {
        self.chain.push(Arc::new(interceptor));
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fold every registered interceptor over `request`, in registration order.
    pub fn apply(&self, request: RequestDescriptor) -> RequestDescriptor {
        self.chain
            .snapshot()
            .iter()
            .fold(request, |req, ic| ic.intercept(req))
    }
}

struct ResponseHandlers {
    on_success: Arc<dyn ResponseInterceptor>,
    on_error: Option<Arc<dyn ErrorInterceptor>>,
}

pub struct ResponseInterceptors {
    chain: Chain<ResponseHandlers>,
}

impl ResponseInterceptors {
    fn new() -> Self {
        Self {
            chain: Chain::new(),
        }
    }

    /// Register a success handler with no error handler.
    pub fn add<S: ResponseInterceptor + 'static>(&self, on_success: S) {
        self.chain.push(Arc::new(ResponseHandlers {
            on_success: Arc::new(on_success),
            on_error: None,
        }));
    }

    /// Register a success handler together with an error handler.
    pub fn add_with_error<S, E>(&self, on_success: S, on_error: E)
    where
        S: ResponseInterceptor + 'static,
        E: ErrorInterceptor + 'static,
    {
        self.chain.push(Arc::new(ResponseHandlers {
            on_success: Arc::new(on_success),
            on_error: Some(Arc::new(on_error)),
        }));
    }

    /// Register only an error handler; responses pass through unchanged.
    pub fn add_error<E: ErrorInterceptor + 'static>(&self, on_error: E) {
        self.add_with_error(|resp: CanonicalResponse| resp, on_error);
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn apply_success(&self, response: CanonicalResponse) -> CanonicalResponse {
        self.chain
            .snapshot()
            .iter()
            .fold(response, |resp, h| h.on_success.on_response(resp))
    }

    /// Fold the registered error handlers, skipping registrations without one.
    pub fn apply_error(&self, error: Error) -> Error {
        self.chain
            .snapshot()
            .iter()
            .filter_map(|h| h.on_error.as_ref())
            .fold(error, |err, handler| handler.on_error(err))
    }
}

/// Per-client interceptor registry (`interceptors.request` / `interceptors.response`).
pub struct Interceptors {
    pub request: RequestInterceptors,
    pub response: ResponseInterceptors,
}

impl Interceptors {
    pub fn new() -> Self {
        Self {
            request: RequestInterceptors::new(),
            response: ResponseInterceptors::new(),
        }
    }
}

impl Default for Interceptors {
    fn default() -> Self {
        Self::new()
    }
}
