//! Request execution.
//!
//! ```text
//! resolve → bind params → middleware* → pre → exec → post → format_output
//!    └──────────┴──────────────┴──────────┴──────┴──────┴──→ format_output(Err)
//! ```
//!
//! Every request ends in exactly one `format_output` call. Router-level
//! failures arrive as [`Error::Router`]; handler failures as
//! [`Error::Handler`], carrying the handler's own error value.

use tracing::{debug, debug_span};

use crate::engine::RequestEngine;
use crate::error::{Error, RouterError};
use crate::handler::BoxedHandler;
use crate::method::Method;
use crate::params::extract_path_params;
use crate::router::Route;

/// Routes the engine's request through `root` and returns the formatted
/// response.
pub fn execute<E: RequestEngine + ?Sized>(engine: &E, root: &Route<E>) -> E::Response {
    let span = debug_span!("execute", verb = engine.verb(), path = engine.path());
    let _enter = span.enter();

    engine.format_output(route(engine, root))
}

/// Drives `handler` through pre-execution, execution and post-execution,
/// skipping resolution, parameter binding and middlewares.
pub fn execute_handler<E: RequestEngine + ?Sized>(engine: &E, handler: BoxedHandler<E>) -> E::Response {
    engine.format_output(run(engine, handler))
}

fn route<E: RequestEngine + ?Sized>(engine: &E, root: &Route<E>) -> Result<E::Output, Error> {
    let resolved = engine
        .verb()
        .parse::<Method>()
        .ok()
        .and_then(|method| root.find(engine.path(), method));
    let Some(resolved) = resolved else {
        debug!(code = RouterError::NotFound.code(), "not found");
        return Err(RouterError::NotFound.into());
    };

    let params = extract_path_params(engine.path(), &resolved.parameterised_path)
        .map_err(RouterError::PathParams)
        .inspect_err(|e| {
            debug!(code = e.code(), route = %resolved.parameterised_path, details = ?e.details(), "path params");
        })?;

    let mut handler = resolved.handler.bind_params(params);
    for middleware in resolved.middlewares {
        handler = middleware
            .wrap(handler)
            .map_err(RouterError::Middleware)
            .inspect_err(|e| debug!(code = e.code(), details = ?e.details(), "middleware refused"))?;
    }

    run(engine, handler)
}

fn run<E: RequestEngine + ?Sized>(engine: &E, handler: BoxedHandler<E>) -> Result<E::Output, Error> {
    let handler = handler.pre_execution(engine).map_err(Error::Handler)?;
    let output = handler.execution(engine).map_err(Error::Handler)?;
    handler.post_execution(engine, output).map_err(Error::Handler)
}
