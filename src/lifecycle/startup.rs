//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Turn config sections into router settings (root, hook, files)
//! - Bind the listener last, once routes are complete
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Application routes are added by the caller between
//!   `configure_router` and `RouterBuilder::build`

use std::any::Any;
use std::path::Path;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, AppConfig, ConfigError};
use crate::http::files::DirProvider;
use crate::http::AppError;
use crate::routing::{panic_message, RequestHead, RouterBuilder};
use crate::security::bearer_auth;

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Load the config file, or defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<AppConfig, StartupError> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(AppConfig::default()),
    }
}

/// Router builder with every config-driven setting applied.
pub fn configure_router(config: &AppConfig) -> RouterBuilder {
    let mut builder = RouterBuilder::from_config(&config.routing).panic_handler(recover_panic);

    if let Some(key) = &config.security.api_key {
        builder = builder.wrapper(bearer_auth(key.clone()));
    }

    if let Some(dir) = &config.files.dir {
        tracing::info!(dir = %dir, route = %config.files.route, "Serving static files");
        builder = builder.file_serve(&config.files.route, DirProvider::new(dir));
    }

    builder
}

/// Panic handler installed by `configure_router`: log and answer 500.
pub fn recover_panic(head: &RequestHead, payload: Box<dyn Any + Send>) -> Response {
    tracing::error!(
        method = %head.method,
        uri = %head.uri,
        panic = %panic_message(payload.as_ref()),
        "Recovered from handler panic"
    );
    AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}

/// Bind the configured listener address.
pub async fn bind(config: &AppConfig) -> Result<TcpListener, StartupError> {
    let address = config.listener.bind_address.clone();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_path_uses_defaults() {
        let config = load(None).unwrap();
        assert_eq!(config.routing.root, "/");
    }

    #[test]
    fn test_recover_panic_answers_500() {
        let head = RequestHead {
            method: axum::http::Method::GET,
            uri: "/boom".parse().unwrap(),
            headers: Default::default(),
        };
        let response = recover_panic(&head, Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_bind_reports_address() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "127.0.0.1:99999".to_string();
        let err = bind(&config).await.unwrap_err();
        assert!(err.to_string().starts_with("cannot bind 127.0.0.1:99999"));
    }
}
