//! Minimal HTTP request router library.
//!
//! Routes are registered on a [`RouterBuilder`](routing::RouterBuilder),
//! frozen into an [`AppRouter`](routing::AppRouter) and served by
//! [`HttpServer`](http::HttpServer).

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::AppConfig;
pub use http::{AppError, Handler, HttpServer, Params};
pub use lifecycle::Shutdown;
pub use routing::{AppRouter, RouterBuilder};
