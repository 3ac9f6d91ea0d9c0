//! Integration test common infrastructure.
//!
//! A request engine that records what handlers and middlewares do, plus a
//! few middlewares built the way applications write them.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use ramus::{BoxError, BoxedHandler, Error, Handler, Middleware, PathParams, RequestEngine};

pub struct Recorder {
    verb: String,
    path: String,
    body: Vec<u8>,
    headers: HashMap<String, String>,
    query: HashMap<String, String>,
    log: RefCell<Vec<String>>,
    formats: Cell<usize>,
}

impl Recorder {
    pub fn new(verb: &str, path: &str) -> Self {
        Self {
            verb: verb.to_owned(),
            path: path.to_owned(),
            body: Vec::new(),
            headers: HashMap::new(),
            query: HashMap::new(),
            log: RefCell::new(Vec::new()),
            formats: Cell::new(0),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_owned(), value.to_owned());
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn with_body(mut self, body: &[u8]) -> Self {
        self.body = body.to_vec();
        self
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.log.borrow_mut().push(entry.into());
    }

    pub fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn formats(&self) -> usize {
        self.formats.get()
    }
}

impl RequestEngine for Recorder {
    type Output = String;
    type Response = Result<String, Error>;

    fn path(&self) -> &str { &self.path }
    fn verb(&self) -> &str { &self.verb }
    fn body(&self) -> &[u8] { &self.body }
    fn headers(&self) -> &HashMap<String, String> { &self.headers }
    fn query_params(&self) -> &HashMap<String, String> { &self.query }

    fn format_output(&self, outcome: Result<String, Error>) -> Self::Response {
        self.formats.set(self.formats.get() + 1);
        self.record("format");
        outcome
    }
}

/// A handler that logs each phase under `name` and echoes its parameters.
pub struct Echo {
    name: &'static str,
    params: PathParams,
}

impl Echo {
    pub fn new(name: &'static str) -> Self {
        Self { name, params: PathParams::new() }
    }
}

impl Handler<Recorder> for Echo {
    fn bind_params(&self, params: PathParams) -> BoxedHandler<Recorder> {
        Box::new(Self { name: self.name, params })
    }

    fn pre_execution(self: Box<Self>, engine: &Recorder) -> Result<BoxedHandler<Recorder>, BoxError> {
        engine.record(format!("{}:pre", self.name));
        Ok(self)
    }

    fn execution(&self, engine: &Recorder) -> Result<String, BoxError> {
        engine.record(format!("{}:exec", self.name));
        let mut pairs: Vec<_> = self.params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        pairs.sort();
        Ok(format!("{}({})", self.name, pairs.join(",")))
    }

    fn post_execution(&self, engine: &Recorder, output: String) -> Result<String, BoxError> {
        engine.record(format!("{}:post", self.name));
        Ok(output)
    }
}

/// Decorates the handler so that `name:before` / `name:after` bracket it.
pub struct Around(pub &'static str);

impl Middleware<Recorder> for Around {
    fn wrap(&self, inner: BoxedHandler<Recorder>) -> Result<BoxedHandler<Recorder>, BoxError> {
        Ok(Box::new(Bracketed { name: self.0, inner }))
    }
}

struct Bracketed {
    name: &'static str,
    inner: BoxedHandler<Recorder>,
}

impl Handler<Recorder> for Bracketed {
    fn bind_params(&self, params: PathParams) -> BoxedHandler<Recorder> {
        Box::new(Self { name: self.name, inner: self.inner.bind_params(params) })
    }

    fn pre_execution(self: Box<Self>, engine: &Recorder) -> Result<BoxedHandler<Recorder>, BoxError> {
        engine.record(format!("{}:before", self.name));
        let inner = self.inner.pre_execution(engine)?;
        Ok(Box::new(Self { name: self.name, inner }))
    }

    fn execution(&self, engine: &Recorder) -> Result<String, BoxError> {
        self.inner.execution(engine)
    }

    fn post_execution(&self, engine: &Recorder, output: String) -> Result<String, BoxError> {
        let output = self.inner.post_execution(engine, output)?;
        engine.record(format!("{}:after", self.name));
        Ok(output)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("missing bearer token")]
pub struct Unauthorized;

/// Rejects requests without an `Authorization: Bearer …` header during
/// pre-execution. The rejection is a handler error, not a middleware error:
/// wrapping always succeeds.
pub struct RequireBearer;

impl Middleware<Recorder> for RequireBearer {
    fn wrap(&self, inner: BoxedHandler<Recorder>) -> Result<BoxedHandler<Recorder>, BoxError> {
        Ok(Box::new(Guarded { inner }))
    }
}

struct Guarded {
    inner: BoxedHandler<Recorder>,
}

impl Handler<Recorder> for Guarded {
    fn bind_params(&self, params: PathParams) -> BoxedHandler<Recorder> {
        Box::new(Self { inner: self.inner.bind_params(params) })
    }

    fn pre_execution(self: Box<Self>, engine: &Recorder) -> Result<BoxedHandler<Recorder>, BoxError> {
        match engine.header("authorization") {
            Some(token) if token.starts_with("Bearer ") => self.inner.pre_execution(engine),
            _ => Err(Unauthorized.into()),
        }
    }

    fn execution(&self, engine: &Recorder) -> Result<String, BoxError> {
        self.inner.execution(engine)
    }

    fn post_execution(&self, engine: &Recorder, output: String) -> Result<String, BoxError> {
        self.inner.post_execution(engine, output)
    }
}
