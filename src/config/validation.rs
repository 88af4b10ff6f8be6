//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, status codes, addresses)
//! - Check route templates and prefixes are `/`-rooted
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("{field} `{value}` must start with '/'")]
    NotRooted { field: &'static str, value: String },

    #[error("routing.not_found_status {0} is not a 4xx or 5xx status")]
    NotFoundStatus(u16),

    #[error("files.dir `{0}` is not a directory")]
    FilesDir(String),

    #[error("security.api_key must not be empty")]
    EmptyApiKey,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let rooted = [
        ("routing.root", &config.routing.root),
        ("routing.api_prefix", &config.routing.api_prefix),
        ("files.route", &config.files.route),
    ];
    for (field, value) in rooted {
        if !value.starts_with('/') {
            errors.push(ValidationError::NotRooted {
                field,
                value: value.clone(),
            });
        }
    }

    if !(400..600).contains(&config.routing.not_found_status) {
        errors.push(ValidationError::NotFoundStatus(
            config.routing.not_found_status,
        ));
    }

    if let Some(dir) = &config.files.dir {
        if !std::path::Path::new(dir).is_dir() {
            errors.push(ValidationError::FilesDir(dir.clone()));
        }
    }

    if matches!(&config.security.api_key, Some(key) if key.is_empty()) {
        errors.push(ValidationError::EmptyApiKey);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
