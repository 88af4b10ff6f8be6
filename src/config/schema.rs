//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Root prefix, API namespace and lookup defaults.
    pub routing: RoutingConfig,

    /// Static file serving.
    pub files: FilesConfig,

    /// Preprocessing (authentication) settings.
    pub security: SecurityConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// URL prefix the router is mounted under (e.g., "/chat/").
    pub root: String,

    /// Paths below `root` starting with this prefix run through the
    /// preprocessing hook.
    pub api_prefix: String,

    /// Status returned when the method is known but no template matches.
    pub not_found_status: u16,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            root: "/".to_string(),
            api_prefix: "/api/".to_string(),
            not_found_status: 404,
        }
    }
}

/// Static file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Directory to serve; file serving is disabled when unset.
    pub dir: Option<String>,

    /// GET template bound to the file handler.
    pub route: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            dir: None,
            route: "/static/:file".to_string(),
        }
    }
}

/// Security configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SecurityConfig {
    /// Bearer token required on API paths. No check when unset.
    pub api_key: Option<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` overrides it.
    pub log_filter: String,

    /// Colored output.
    pub ansi: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "approuter=debug,tower_http=debug".to_string(),
            ansi: true,
        }
    }
}
