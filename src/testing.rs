//! Test doubles shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::engine::RequestEngine;
use crate::error::{BoxError, Error};
use crate::handler::{BoxedHandler, Handler};
use crate::params::PathParams;

/// Records everything handlers and middlewares do, and how often the
/// pipeline formats an outcome.
pub(crate) struct TestEngine {
    path: String,
    verb: String,
    empty: HashMap<String, String>,
    pub(crate) log: RefCell<Vec<String>>,
    pub(crate) formats: Cell<usize>,
}

impl TestEngine {
    pub(crate) fn new(verb: &str, path: &str) -> Self {
        Self {
            path: path.to_owned(),
            verb: verb.to_owned(),
            empty: HashMap::new(),
            log: RefCell::new(Vec::new()),
            formats: Cell::new(0),
        }
    }

    pub(crate) fn record(&self, entry: impl Into<String>) {
        self.log.borrow_mut().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl RequestEngine for TestEngine {
    type Output = String;
    type Response = Result<String, Error>;

    fn path(&self) -> &str { &self.path }
    fn verb(&self) -> &str { &self.verb }
    fn body(&self) -> &[u8] { &[] }
    fn headers(&self) -> &HashMap<String, String> { &self.empty }
    fn query_params(&self) -> &HashMap<String, String> { &self.empty }

    fn format_output(&self, outcome: Result<String, Error>) -> Self::Response {
        self.formats.set(self.formats.get() + 1);
        outcome
    }
}

/// Returns its label, followed by its bound parameters in key order.
#[derive(Clone)]
pub(crate) struct Labelled {
    label: &'static str,
    params: PathParams,
}

impl Labelled {
    pub(crate) fn new(label: &'static str) -> Self {
        Self { label, params: PathParams::new() }
    }
}

impl Handler<TestEngine> for Labelled {
    fn bind_params(&self, params: PathParams) -> BoxedHandler<TestEngine> {
        Box::new(Self { label: self.label, params })
    }

    fn pre_execution(self: Box<Self>, engine: &TestEngine) -> Result<BoxedHandler<TestEngine>, BoxError> {
        engine.record(format!("{}:pre", self.label));
        Ok(self)
    }

    fn execution(&self, engine: &TestEngine) -> Result<String, BoxError> {
        engine.record(format!("{}:exec", self.label));
        let mut params: Vec<_> = self.params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        params.sort();
        if params.is_empty() {
            Ok(self.label.to_owned())
        } else {
            Ok(format!("{} {}", self.label, params.join(",")))
        }
    }

    fn post_execution(&self, engine: &TestEngine, output: String) -> Result<String, BoxError> {
        engine.record(format!("{}:post", self.label));
        Ok(output)
    }
}

/// Middleware that wraps the handler in a [`Tagged`] layer.
pub(crate) struct Tag(&'static str);

impl Tag {
    pub(crate) fn new(name: &'static str) -> Self {
        Self(name)
    }
}

impl crate::middleware::Middleware<TestEngine> for Tag {
    fn wrap(&self, handler: BoxedHandler<TestEngine>) -> Result<BoxedHandler<TestEngine>, BoxError> {
        Ok(Box::new(Tagged { name: self.0, inner: handler }))
    }
}

/// Logs `name:before` on the way in and `name:after` on the way out.
pub(crate) struct Tagged {
    name: &'static str,
    inner: BoxedHandler<TestEngine>,
}

impl Handler<TestEngine> for Tagged {
    fn bind_params(&self, params: PathParams) -> BoxedHandler<TestEngine> {
        Box::new(Self { name: self.name, inner: self.inner.bind_params(params) })
    }

    fn pre_execution(self: Box<Self>, engine: &TestEngine) -> Result<BoxedHandler<TestEngine>, BoxError> {
        engine.record(format!("{}:before", self.name));
        let inner = self.inner.pre_execution(engine)?;
        Ok(Box::new(Self { name: self.name, inner }))
    }

    fn execution(&self, engine: &TestEngine) -> Result<String, BoxError> {
        self.inner.execution(engine)
    }

    fn post_execution(&self, engine: &TestEngine, output: String) -> Result<String, BoxError> {
        let output = self.inner.post_execution(engine, output)?;
        engine.record(format!("{}:after", self.name));
        Ok(output)
    }
}
