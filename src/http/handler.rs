//! Handler shapes and the per-request parameter set.
//!
//! # Handler Kinds
//! - `Handler::App`: buffered. Writes into a private sink owned by the
//!   dispatcher; the client sees either the complete body or an error.
//! - `Handler::File`: raw. Receives the request and the file provider and
//!   produces the live response itself; the dispatcher passes it through.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::http::error::AppError;
use crate::http::files::FileProvider;

/// Buffered application handler.
pub type AppHandle =
    Arc<dyn Fn(&mut dyn Write, &Request<Body>, &Params) -> Result<(), AppError> + Send + Sync>;

/// Raw handler with direct ownership of the response.
pub type FileHandle =
    Arc<dyn Fn(Request<Body>, Arc<dyn FileProvider>) -> BoxFuture<'static, Response> + Send + Sync>;

/// A registered handler.
#[derive(Clone)]
pub enum Handler {
    App(AppHandle),
    File(FileHandle),
}

impl Handler {
    /// Wrap a closure as a buffered handler.
    pub fn app<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Write, &Request<Body>, &Params) -> Result<(), AppError>
            + Send
            + Sync
            + 'static,
    {
        Handler::App(Arc::new(f))
    }

    /// Wrap a closure as a raw handler.
    pub fn file<F>(f: F) -> Self
    where
        F: Fn(Request<Body>, Arc<dyn FileProvider>) -> BoxFuture<'static, Response>
            + Send
            + Sync
            + 'static,
    {
        Handler::File(Arc::new(f))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Handler::File(_))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::App(_) => f.write_str("Handler::App"),
            Handler::File(_) => f.write_str("Handler::File"),
        }
    }
}

/// Wildcard values extracted from the request path.
///
/// Keys are wildcard names without the `:` marker. Iteration order is
/// unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(HashMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look up a required parameter, failing with 400 when it is absent.
    pub fn require(&self, name: &str) -> Result<&str, AppError> {
        self.get(name)
            .ok_or_else(|| AppError::bad_request(format!("missing path parameter: {}", name)))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
