//! Route tree and its builder.
//!
//! A tree of owned nodes. Each node holds a path segment, its children in
//! declaration order, one optional handler per verb, and the middlewares
//! attached at that level. Build it once with [`Route::root`]; after that the
//! tree is only read, so a single `Arc<Route<E>>` can serve any number of
//! concurrent requests without locking.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::engine::RequestEngine;
use crate::handler::{Handler, SharedHandler};
use crate::matcher::Segment;
use crate::method::Method;
use crate::middleware::Middleware;

/// A middleware as stored on the route tree.
pub type SharedMiddleware<E> = Arc<dyn Middleware<E>>;

/// One node of the route tree.
///
/// The root has an empty path and matches every request without consuming a
/// segment. The same holds for any node added with an empty path (`""` or
/// `"/"`), which makes such nodes useful for grouping routes under a shared
/// middleware.
pub struct Route<E: RequestEngine + ?Sized> {
    path: String,
    pub(crate) segments: Vec<Segment>,
    pub(crate) children: Vec<Route<E>>,
    handlers: [Option<SharedHandler<E>>; 6],
    pub(crate) middlewares: Vec<SharedMiddleware<E>>,
}

impl<E: RequestEngine + ?Sized> Route<E> {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            segments: Segment::parse_path(path),
            children: Vec::new(),
            handlers: Default::default(),
            middlewares: Vec::new(),
        }
    }

    /// Creates the root node and lets `configure` populate it.
    ///
    /// ```rust,ignore
    /// let tree = Route::root(|root| {
    ///     root.use_middleware(auth);
    ///     root.get("/", index);
    ///     root.add_route("/users", |users| {
    ///         users.get("/{id}", get_user).delete("/{id}", delete_user);
    ///     });
    /// });
    /// ```
    pub fn root(configure: impl FnOnce(&mut Self)) -> Self {
        let mut root = Self::new("");
        configure(&mut root);
        root
    }

    /// Appends a child node for `path`, populated by `configure`.
    ///
    /// Always creates a new child, even if a sibling with the same path
    /// already exists. Overlapping registrations resolve in declaration order.
    pub fn add_route(&mut self, path: &str, configure: impl FnOnce(&mut Self)) -> &mut Self {
        let mut child = Self::new(path);
        configure(&mut child);
        self.children.push(child);
        self
    }

    /// Attaches a middleware to this node. Calls on the same node run in
    /// registration order: each later middleware wraps the earlier ones.
    pub fn use_middleware(&mut self, middleware: impl Middleware<E> + 'static) -> &mut Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn get(&mut self, path: &str, handler: impl Handler<E> + 'static) -> &mut Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(&mut self, path: &str, handler: impl Handler<E> + 'static) -> &mut Self {
        self.on(Method::Post, path, handler)
    }

    pub fn put(&mut self, path: &str, handler: impl Handler<E> + 'static) -> &mut Self {
        self.on(Method::Put, path, handler)
    }

    pub fn delete(&mut self, path: &str, handler: impl Handler<E> + 'static) -> &mut Self {
        self.on(Method::Delete, path, handler)
    }

    pub fn patch(&mut self, path: &str, handler: impl Handler<E> + 'static) -> &mut Self {
        self.on(Method::Patch, path, handler)
    }

    pub fn head(&mut self, path: &str, handler: impl Handler<E> + 'static) -> &mut Self {
        self.on(Method::Head, path, handler)
    }

    /// Registers `handler` for `method` on the child at `path`.
    ///
    /// `"/"` means this node. Otherwise the first child whose path string is
    /// exactly `path` is reused, or a new child is appended. Registering the
    /// same verb twice keeps the last handler.
    pub fn on(&mut self, method: Method, path: &str, handler: impl Handler<E> + 'static) -> &mut Self {
        self.node_for(path).set_handler(method, handler);
        self
    }

    /// Sets the handler for `method` on this node, replacing any previous one.
    pub fn set_handler(&mut self, method: Method, handler: impl Handler<E> + 'static) -> &mut Self {
        let previous = self.handlers[method.index()].replace(Arc::new(handler));
        if previous.is_some() {
            trace!(path = %self.path, %method, "handler replaced");
        }
        self
    }

    // Looked up by index so the mutation lands on the stored child.
    fn node_for(&mut self, path: &str) -> &mut Self {
        if path == "/" {
            return self;
        }
        let idx = match self.children.iter().position(|child| child.path == path) {
            Some(idx) => idx,
            None => {
                self.children.push(Self::new(path));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    /// The path string this node was registered with.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn children(&self) -> &[Route<E>] {
        &self.children
    }

    pub fn middlewares(&self) -> &[SharedMiddleware<E>] {
        &self.middlewares
    }

    pub fn handler(&self, method: Method) -> Option<&SharedHandler<E>> {
        self.handlers[method.index()].as_ref()
    }

    /// Whether this node matches without consuming a request segment.
    pub fn is_transparent(&self) -> bool {
        self.segments.is_empty()
    }
}

impl<E: RequestEngine + ?Sized> fmt::Debug for Route<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verbs: Vec<Method> = Method::ALL
            .into_iter()
            .filter(|m| self.handler(*m).is_some())
            .collect();
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("verbs", &verbs)
            .field("middlewares", &self.middlewares.len())
            .field("children", &self.children)
            .finish()
    }
}
