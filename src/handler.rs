//! Handler trait and the closure adapter.
//!
//! # Lifecycle
//!
//! A handler registered on the tree is shared by every request that matches
//! it, so the tree holds it behind an `Arc` and never mutates it. Each request
//! starts by asking the shared instance for a private copy carrying the path
//! parameters, then drives that copy through three phases:
//!
//! ```text
//! tree: Arc<dyn Handler<E>>
//!        ↓ bind_params(params)          ← per-request Box<dyn Handler<E>>
//!        ↓ middleware.wrap(h)*          ← possibly a different handler
//!        ↓ pre_execution(engine)        ← may replace the handler again
//!        ↓ execution(engine)            ← produces E::Output
//!        ↓ post_execution(engine, out)  ← final E::Output
//! ```
//!
//! Any phase may fail; the error reaches the formatting call unchanged.

use std::sync::Arc;

use crate::engine::RequestEngine;
use crate::error::BoxError;
use crate::params::PathParams;

// ── Public types ──────────────────────────────────────────────────────────────

/// A per-request handler instance.
pub type BoxedHandler<E> = Box<dyn Handler<E>>;

/// A handler as stored on the route tree, shared across concurrent requests.
pub type SharedHandler<E> = Arc<dyn Handler<E>>;

/// The four capabilities the pipeline drives.
///
/// `pre_execution` takes the boxed instance by value so it can return itself,
/// a decorated version of itself, or something else entirely.
pub trait Handler<E: RequestEngine + ?Sized>: Send + Sync {
    /// Returns a request-local instance carrying `params`.
    fn bind_params(&self, params: PathParams) -> BoxedHandler<E>;

    fn pre_execution(self: Box<Self>, engine: &E) -> Result<BoxedHandler<E>, BoxError>;

    fn execution(&self, engine: &E) -> Result<E::Output, BoxError>;

    /// Receives what [`execution`](Handler::execution) returned.
    fn post_execution(&self, engine: &E, output: E::Output) -> Result<E::Output, BoxError>;
}

// ── Closure adapter ───────────────────────────────────────────────────────────

/// Wraps a closure as a [`Handler`] whose pre- and post-execution phases are
/// pass-through.
///
/// ```rust
/// # use std::collections::HashMap;
/// # use ramus::{Error, PathParams, RequestEngine, Route, handler_fn};
/// # struct Lambda { path: String, verb: String, map: HashMap<String, String> }
/// # impl RequestEngine for Lambda {
/// #     type Output = String;
/// #     type Response = String;
/// #     fn path(&self) -> &str { &self.path }
/// #     fn verb(&self) -> &str { &self.verb }
/// #     fn body(&self) -> &[u8] { &[] }
/// #     fn headers(&self) -> &HashMap<String, String> { &self.map }
/// #     fn query_params(&self) -> &HashMap<String, String> { &self.map }
/// #     fn format_output(&self, out: Result<String, Error>) -> String {
/// #         out.unwrap_or_else(|e| e.to_string())
/// #     }
/// # }
/// let root = Route::<Lambda>::root(|root| {
///     root.get("/users/{id}", handler_fn(|_: &Lambda, params: &PathParams| {
///         Ok(format!("user {}", params["id"]))
///     }));
/// });
/// ```
pub fn handler_fn<E, F>(f: F) -> FnHandler<F>
where
    E: RequestEngine + ?Sized,
    F: Fn(&E, &PathParams) -> Result<E::Output, BoxError> + Send + Sync + 'static,
{
    FnHandler { f: Arc::new(f), params: PathParams::new() }
}

/// Handler produced by [`handler_fn`]. Binding parameters clones the `Arc`
/// around the closure, never the closure itself.
pub struct FnHandler<F> {
    f: Arc<F>,
    params: PathParams,
}

impl<F> FnHandler<F> {
    /// Parameters bound to this instance.
    pub fn params(&self) -> &PathParams {
        &self.params
    }
}

impl<E, F> Handler<E> for FnHandler<F>
where
    E: RequestEngine + ?Sized,
    F: Fn(&E, &PathParams) -> Result<E::Output, BoxError> + Send + Sync + 'static,
{
    fn bind_params(&self, params: PathParams) -> BoxedHandler<E> {
        Box::new(FnHandler { f: Arc::clone(&self.f), params })
    }

    fn pre_execution(self: Box<Self>, _engine: &E) -> Result<BoxedHandler<E>, BoxError> {
        Ok(self)
    }

    fn execution(&self, engine: &E) -> Result<E::Output, BoxError> {
        (self.f)(engine, &self.params)
    }

    fn post_execution(&self, _engine: &E, output: E::Output) -> Result<E::Output, BoxError> {
        Ok(output)
    }
}
