//! ramus behind a hyper server: a user API with a token guard.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic [-- 127.0.0.1:3000]
//!
//! Try:
//!   curl http://localhost:3000/healthz
//!   curl http://localhost:3000/users/42 -H 'authorization: Bearer demo'
//!   curl -X POST http://localhost:3000/users -H 'authorization: Bearer demo' -d 'alice'
//!   curl http://localhost:3000/users/42          ← 400, missing token
//!   curl -X PUT http://localhost:3000/users/42   ← 404, no PUT route

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use ramus::{
    BoxError, BoxedHandler, Error, Handler, Middleware, PathParams, RequestEngine, Route, RouterError,
    execute, handler_fn,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type HttpResponse = http::Response<Full<Bytes>>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr: SocketAddr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:3000".to_owned())
        .parse()?;

    let tree = Arc::new(Route::<HttpEngine>::root(|root| {
        root.use_middleware(AccessLog);
        root.get("/healthz", handler_fn(|_: &HttpEngine, _: &PathParams| Ok(json!({ "status": "ok" }))));

        root.add_route("/users", |users| {
            users.use_middleware(RequireToken);
            users.post("/", handler_fn(create_user));
            users.get("/{id}", handler_fn(get_user));
            users.delete("/{id}", handler_fn(|_: &HttpEngine, _: &PathParams| Ok(Value::Null)));
        });
    }));

    serve(addr, tree).await
}

// GET /users/{id}
fn get_user(_req: &HttpEngine, params: &PathParams) -> Result<Value, BoxError> {
    let id = params.get("id").map_or("unknown", String::as_str);
    Ok(json!({ "id": id, "name": "alice" }))
}

// POST /users. The body is the new user's name.
fn create_user(req: &HttpEngine, _: &PathParams) -> Result<Value, BoxError> {
    let name = std::str::from_utf8(req.body())?.trim();
    if name.is_empty() {
        return Err("name is required".into());
    }
    Ok(json!({ "id": "99", "name": name }))
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// One buffered HTTP request.
struct HttpEngine {
    verb: String,
    path: String,
    body: Bytes,
    headers: HashMap<String, String>,
    query: HashMap<String, String>,
}

impl HttpEngine {
    async fn read(req: hyper::Request<Incoming>) -> Result<Self, hyper::Error> {
        let (parts, body) = req.into_parts();
        let body = body.collect().await?.to_bytes();

        // Non-UTF-8 header values are dropped.
        let headers = parts
            .headers
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_owned(), v.to_str().ok()?.to_owned())))
            .collect();
        let query = parts
            .uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Ok(Self {
            verb: parts.method.as_str().to_owned(),
            path: parts.uri.path().to_owned(),
            body,
            headers,
            query,
        })
    }
}

impl RequestEngine for HttpEngine {
    type Output = Value;
    type Response = HttpResponse;

    fn path(&self) -> &str { &self.path }
    fn verb(&self) -> &str { &self.verb }
    fn body(&self) -> &[u8] { &self.body }
    fn headers(&self) -> &HashMap<String, String> { &self.headers }
    fn query_params(&self) -> &HashMap<String, String> { &self.query }

    fn format_output(&self, outcome: Result<Value, Error>) -> HttpResponse {
        match outcome {
            Ok(body) => respond(StatusCode::OK, &body),
            Err(Error::Router(RouterError::NotFound)) => {
                respond(StatusCode::NOT_FOUND, &json!({ "error": "Not found" }))
            }
            Err(Error::Router(e)) => respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "error": e.message(), "details": e.details() }),
            ),
            Err(Error::Handler(e)) => respond(StatusCode::BAD_REQUEST, &json!({ "error": e.to_string() })),
        }
    }
}

fn respond(status: StatusCode, body: &Value) -> HttpResponse {
    let mut res = http::Response::new(Full::new(Bytes::from(body.to_string())));
    *res.status_mut() = status;
    res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    res
}

// ── Middlewares ───────────────────────────────────────────────────────────────

/// Logs method, path and latency once the handler finishes.
struct AccessLog;

impl Middleware<HttpEngine> for AccessLog {
    fn wrap(&self, inner: BoxedHandler<HttpEngine>) -> Result<BoxedHandler<HttpEngine>, BoxError> {
        Ok(Box::new(Timed { started: Instant::now(), inner }))
    }
}

struct Timed {
    started: Instant,
    inner: BoxedHandler<HttpEngine>,
}

impl Handler<HttpEngine> for Timed {
    fn bind_params(&self, params: PathParams) -> BoxedHandler<HttpEngine> {
        Box::new(Self { started: self.started, inner: self.inner.bind_params(params) })
    }

    fn pre_execution(self: Box<Self>, req: &HttpEngine) -> Result<BoxedHandler<HttpEngine>, BoxError> {
        let inner = self.inner.pre_execution(req)?;
        Ok(Box::new(Self { started: self.started, inner }))
    }

    fn execution(&self, req: &HttpEngine) -> Result<Value, BoxError> {
        self.inner.execution(req)
    }

    fn post_execution(&self, req: &HttpEngine, output: Value) -> Result<Value, BoxError> {
        let output = self.inner.post_execution(req, output)?;
        info!(verb = req.verb(), path = req.path(), elapsed = ?self.started.elapsed(), "handled");
        Ok(output)
    }
}

/// Demands `authorization: Bearer <anything>`.
struct RequireToken;

impl Middleware<HttpEngine> for RequireToken {
    fn wrap(&self, inner: BoxedHandler<HttpEngine>) -> Result<BoxedHandler<HttpEngine>, BoxError> {
        Ok(Box::new(Guarded(inner)))
    }
}

struct Guarded(BoxedHandler<HttpEngine>);

impl Handler<HttpEngine> for Guarded {
    fn bind_params(&self, params: PathParams) -> BoxedHandler<HttpEngine> {
        Box::new(Self(self.0.bind_params(params)))
    }

    fn pre_execution(self: Box<Self>, req: &HttpEngine) -> Result<BoxedHandler<HttpEngine>, BoxError> {
        match req.header("authorization") {
            Some(v) if v.starts_with("Bearer ") => self.0.pre_execution(req),
            _ => Err("missing bearer token".into()),
        }
    }

    fn execution(&self, req: &HttpEngine) -> Result<Value, BoxError> {
        self.0.execution(req)
    }

    fn post_execution(&self, req: &HttpEngine, output: Value) -> Result<Value, BoxError> {
        self.0.post_execution(req, output)
    }
}

// ── Server ────────────────────────────────────────────────────────────────────

async fn serve(addr: SocketAddr, tree: Arc<Route<HttpEngine>>) -> Result<(), BoxError> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    let mut tasks = tokio::task::JoinSet::new();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, peer) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let tree = Arc::clone(&tree);
                let io = TokioIo::new(stream);

                tasks.spawn(async move {
                    let svc = service_fn(move |req| {
                        let tree = Arc::clone(&tree);
                        async move { dispatch(tree, req).await }
                    });

                    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                        .serve_connection(io, svc)
                        .await
                    {
                        error!(%peer, "connection error: {e}");
                    }
                });
            }

            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    while tasks.join_next().await.is_some() {}
    info!("stopped");
    Ok(())
}

async fn dispatch(tree: Arc<Route<HttpEngine>>, req: hyper::Request<Incoming>) -> Result<HttpResponse, Infallible> {
    let engine = match HttpEngine::read(req).await {
        Ok(engine) => engine,
        Err(e) => {
            error!("failed to read request body: {e}");
            return Ok(respond(StatusCode::BAD_REQUEST, &json!({ "error": "unreadable body" })));
        }
    };
    Ok(execute(&engine, &tree))
}
