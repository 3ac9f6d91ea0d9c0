//! Middleware: handler-to-handler transformations.
//!
//! A middleware receives the handler the pipeline is about to run and returns
//! the handler to run instead, usually a wrapper that delegates to the
//! original. Authentication, tracing, and validation live here; the engine
//! only knows the order to apply them in.
//!
//! Middlewares attached nearer the root wrap the ones attached nearer the
//! matched node, so a root-level middleware's pre-execution runs first and
//! its post-execution runs last.

use crate::engine::RequestEngine;
use crate::error::BoxError;
use crate::handler::BoxedHandler;

/// A single "wrap" capability. Failing aborts the request with
/// [`RouterError::Middleware`](crate::RouterError::Middleware).
pub trait Middleware<E: RequestEngine + ?Sized>: Send + Sync {
    fn wrap(&self, handler: BoxedHandler<E>) -> Result<BoxedHandler<E>, BoxError>;
}

/// Any `Fn(BoxedHandler<E>) -> Result<BoxedHandler<E>, BoxError>` is a middleware.
impl<E, F> Middleware<E> for F
where
    E: RequestEngine + ?Sized,
    F: Fn(BoxedHandler<E>) -> Result<BoxedHandler<E>, BoxError> + Send + Sync,
{
    fn wrap(&self, handler: BoxedHandler<E>) -> Result<BoxedHandler<E>, BoxError> {
        self(handler)
    }
}
