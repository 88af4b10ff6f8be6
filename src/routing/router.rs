//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Collect routes, hook and panic handler at startup (`RouterBuilder`)
//! - Rewrite API paths through the preprocessing hook
//! - Look up the handler and its parameters for a request
//! - Invoke buffered handlers into a private buffer, raw handlers directly
//! - Translate failures into a status line plus plain-text body
//!
//! # Design Decisions
//! - Immutable after `build()` (shared without locks)
//! - A buffered handler's output is only sent when it succeeds
//! - With a panic handler, each request runs in a supervising task so a
//!   panicking handler is turned into a response instead of a dropped
//!   connection
//! - The supervising task is aborted when `dispatch` is dropped (timeout,
//!   client gone), so a cancelled request does not keep running detached
//! - Matching sees the percent-decoded path; handlers still get the raw URI

use std::any::Any;
use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;
use tokio::task::AbortHandle;

use crate::config::RoutingConfig;
use crate::http::files::{file_handler, FileProvider};
use crate::http::response::buffered;
use crate::http::{AppError, Handler, Params};
use crate::routing::registry::Registry;

/// Preprocessing hook: receives the request and the root-relative path,
/// returns the path to match.
pub type Wrapper =
    Arc<dyn Fn(&mut Request<Body>, &str) -> Result<String, AppError> + Send + Sync>;

/// Receives the panic payload and owns producing the response.
pub type PanicHandler = Arc<dyn Fn(&RequestHead, Box<dyn Any + Send>) -> Response + Send + Sync>;

/// Snapshot of the request line and headers, taken before dispatch.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl From<&Request<Body>> for RequestHead {
    fn from(req: &Request<Body>) -> Self {
        Self {
            method: req.method().clone(),
            uri: req.uri().clone(),
            headers: req.headers().clone(),
        }
    }
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

/// Collects routes and settings; `build()` freezes them into an `AppRouter`.
pub struct RouterBuilder {
    root: String,
    api_prefix: String,
    registry: Registry,
    wrapper: Option<Wrapper>,
    file_root: Option<Arc<dyn FileProvider>>,
    panic_handler: Option<PanicHandler>,
    not_found_status: StatusCode,
}

impl RouterBuilder {
    /// `root` is the URL prefix this router is mounted under, e.g. `/chat/`.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            api_prefix: "/api/".to_string(),
            registry: Registry::new(),
            wrapper: None,
            file_root: None,
            panic_handler: None,
            not_found_status: StatusCode::NOT_FOUND,
        }
    }

    /// Builder preloaded with the routing section of the config file.
    pub fn from_config(config: &RoutingConfig) -> Self {
        let mut builder = Self::new(config.root.clone()).api_prefix(config.api_prefix.clone());
        match StatusCode::from_u16(config.not_found_status) {
            Ok(code) => builder = builder.not_found_status(code),
            Err(_) => tracing::warn!(
                not_found_status = config.not_found_status,
                "Invalid not-found status, keeping 404"
            ),
        }
        builder
    }

    /// Paths under `root` starting with this prefix go through the hook.
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Register any handler kind under (method, template).
    pub fn route(mut self, method: Method, template: &str, handler: Handler) -> Self {
        self.registry.register(method, template, handler);
        self
    }

    /// Register a buffered handler.
    pub fn handle<F>(self, method: Method, template: &str, f: F) -> Self
    where
        F: Fn(&mut dyn Write, &Request<Body>, &Params) -> Result<(), AppError>
            + Send
            + Sync
            + 'static,
    {
        self.route(method, template, Handler::app(f))
    }

    pub fn get<F>(self, template: &str, f: F) -> Self
    where
        F: Fn(&mut dyn Write, &Request<Body>, &Params) -> Result<(), AppError>
            + Send
            + Sync
            + 'static,
    {
        self.handle(Method::GET, template, f)
    }

    pub fn post<F>(self, template: &str, f: F) -> Self
    where
        F: Fn(&mut dyn Write, &Request<Body>, &Params) -> Result<(), AppError>
            + Send
            + Sync
            + 'static,
    {
        self.handle(Method::POST, template, f)
    }

    /// Serve files from `fs` on GET `template`, e.g. `/js/lib/:name`.
    ///
    /// The router holds a single provider; the last call wins.
    pub fn file_serve(mut self, template: &str, fs: impl FileProvider + 'static) -> Self {
        self.file_root = Some(Arc::new(fs));
        self.route(Method::GET, template, file_handler())
    }

    pub fn wrapper<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Request<Body>, &str) -> Result<String, AppError> + Send + Sync + 'static,
    {
        self.wrapper = Some(Arc::new(f));
        self
    }

    pub fn panic_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&RequestHead, Box<dyn Any + Send>) -> Response + Send + Sync + 'static,
    {
        self.panic_handler = Some(Arc::new(f));
        self
    }

    /// Status for "method known, no template matched".
    pub fn not_found_status(mut self, code: StatusCode) -> Self {
        self.not_found_status = code;
        self
    }

    pub fn build(self) -> AppRouter {
        for method in self.registry.methods() {
            if let Some(table) = self.registry.lookup(method) {
                tracing::info!(method = %method, routes = table.len(), "Routes registered");
            }
        }
        AppRouter {
            inner: Arc::new(Inner {
                root: self.root.trim_end_matches('/').to_string(),
                api_prefix: self.api_prefix,
                registry: self.registry,
                wrapper: self.wrapper,
                file_root: self.file_root,
                panic_handler: self.panic_handler,
                not_found_status: self.not_found_status,
            }),
        }
    }
}

struct Inner {
    /// Root prefix without its trailing `/`.
    root: String,
    api_prefix: String,
    registry: Registry,
    wrapper: Option<Wrapper>,
    file_root: Option<Arc<dyn FileProvider>>,
    panic_handler: Option<PanicHandler>,
    not_found_status: StatusCode,
}

/// The frozen router. Cloning is cheap.
#[derive(Clone)]
pub struct AppRouter {
    inner: Arc<Inner>,
}

impl AppRouter {
    pub fn builder(root: impl Into<String>) -> RouterBuilder {
        RouterBuilder::new(root)
    }

    /// Root-relative path when `path` is inside the API namespace.
    fn api_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.inner.root.as_str())?;
        if rest.starts_with('/') && rest.starts_with(self.inner.api_prefix.as_str()) {
            Some(rest)
        } else {
            None
        }
    }

    /// Run the hook (for API paths) and resolve the handler.
    ///
    /// Templates are matched against the percent-decoded path.
    pub fn get_handle(&self, req: &mut Request<Body>) -> Result<(Handler, Params), AppError> {
        let url = percent_decode_str(req.uri().path())
            .decode_utf8()
            .map_err(|_| AppError::bad_request("invalid UTF-8 in path"))?
            .into_owned();
        let path = match self.api_path(&url) {
            Some(rest) => match &self.inner.wrapper {
                Some(wrapper) => wrapper(req, rest)?,
                None => rest.to_string(),
            },
            None => url.clone(),
        };

        let method = req.method();
        let table = self
            .inner
            .registry
            .lookup(method)
            .ok_or_else(|| AppError::bad_request(format!("invalid method: {}", method)))?;

        match table.find(&path) {
            Some((handler, params)) => Ok((handler.clone(), params)),
            None => Err(AppError::new(
                self.inner.not_found_status,
                format!("no route matches {}", path),
            )),
        }
    }

    /// Handle one request end to end. This is the only entry point the
    /// transport calls.
    pub async fn dispatch(&self, req: Request<Body>) -> Response {
        let Some(panic_handler) = self.inner.panic_handler.clone() else {
            return self.serve(req).await;
        };

        let head = RequestHead::from(&req);
        let router = self.clone();
        let task = tokio::spawn(async move { router.serve(req).await });
        let _abort = AbortOnDrop(task.abort_handle());
        match task.await {
            Ok(response) => response,
            Err(e) if e.is_panic() => {
                let payload = e.into_panic();
                tracing::error!(
                    method = %head.method,
                    uri = %head.uri,
                    panic = %panic_message(payload.as_ref()),
                    "Handler panicked"
                );
                panic_handler(&head, payload)
            }
            Err(e) => {
                tracing::error!(uri = %head.uri, error = %e, "Dispatch task cancelled");
                AppError::other(e).into_response()
            }
        }
    }

    async fn serve(&self, mut req: Request<Body>) -> Response {
        tracing::debug!(method = %req.method(), path = %req.uri().path(), "Dispatching");

        let (handler, params) = match self.get_handle(&mut req) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    status = %e.status(),
                    error = %e,
                    "Request rejected"
                );
                return e.into_response();
            }
        };

        match handler {
            Handler::File(h) => match self.inner.file_root.clone() {
                Some(fs) => h(req, fs).await,
                None => AppError::other("no file provider configured").into_response(),
            },
            Handler::App(h) => {
                let mut buf = Vec::new();
                match h(&mut buf, &req, &params) {
                    Ok(()) => buffered(buf),
                    Err(e) => {
                        tracing::error!(
                            path = %req.uri().path(),
                            status = %e.status(),
                            error = %e,
                            discarded_bytes = buf.len(),
                            "Handler failed"
                        );
                        e.into_response()
                    }
                }
            }
        }
    }
}

/// Aborts the supervised request task if `dispatch` is dropped first.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
