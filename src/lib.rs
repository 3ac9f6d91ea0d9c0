//! # ramus
//!
//! A route tree and handler pipeline that knows nothing about transports.
//!
//! ## The contract
//!
//! You bring the request: an HTTP server, a Lambda event, a test fixture.
//! Wrap it in a [`RequestEngine`] and ramus does the rest of the routing job:
//!
//! - **Resolution**: walks the tree segment by segment; `{name}` matches any
//!   single segment; the first declared sibling that matches wins
//! - **Path parameters**: extracted by name from the matched route
//! - **Middleware**: collected from the matched node up to the root; the
//!   root's wrap outermost
//! - **Lifecycle**: bind params → pre-execution → execution → post-execution
//! - **One exit**: every outcome, success or failure, goes through
//!   [`RequestEngine::format_output`] exactly once
//!
//! What ramus leaves to you: status codes, body formats, auth decisions,
//! logging subscribers.
//!
//! ## Quick start
//!
//! ```rust
//! use std::collections::HashMap;
//! use ramus::{Error, PathParams, RequestEngine, Route, execute, handler_fn};
//!
//! struct Event {
//!     path: String,
//!     verb: String,
//!     none: HashMap<String, String>,
//! }
//!
//! impl RequestEngine for Event {
//!     type Output = String;
//!     type Response = (u16, String);
//!
//!     fn path(&self) -> &str { &self.path }
//!     fn verb(&self) -> &str { &self.verb }
//!     fn body(&self) -> &[u8] { &[] }
//!     fn headers(&self) -> &HashMap<String, String> { &self.none }
//!     fn query_params(&self) -> &HashMap<String, String> { &self.none }
//!
//!     fn format_output(&self, outcome: Result<String, Error>) -> (u16, String) {
//!         match outcome {
//!             Ok(body) => (200, body),
//!             Err(e) if e.is_not_found() => (404, e.to_string()),
//!             Err(Error::Router(e)) => (500, e.to_string()),
//!             Err(Error::Handler(e)) => (400, e.to_string()),
//!         }
//!     }
//! }
//!
//! let tree = Route::<Event>::root(|root| {
//!     root.add_route("/users", |users| {
//!         users.get("/{id}", handler_fn(|_: &Event, params: &PathParams| {
//!             Ok(format!(r#"{{"id":"{}"}}"#, params["id"]))
//!         }));
//!     });
//! });
//!
//! let event = Event { path: "/users/42".into(), verb: "GET".into(), none: HashMap::new() };
//! assert_eq!(execute(&event, &tree), (200, r#"{"id":"42"}"#.to_owned()));
//! ```

mod engine;
mod error;
mod handler;
mod matcher;
mod method;
mod middleware;
mod params;
mod pipeline;
mod router;

#[cfg(test)]
mod testing;

pub use engine::RequestEngine;
pub use error::{BoxError, Error, RouterError};
pub use handler::{BoxedHandler, FnHandler, Handler, SharedHandler, handler_fn};
pub use matcher::Resolved;
pub use method::{Method, UnsupportedMethod};
pub use middleware::Middleware;
pub use params::{ParamsError, PathParams, extract_path_params};
pub use pipeline::{execute, execute_handler};
pub use router::{Route, SharedMiddleware};
