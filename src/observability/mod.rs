//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router, server and hooks produce:
//!     → tracing events with structured fields
//!     → per-request spans (method, uri, request id) from the trace layer
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every event of a request via the span
//! - Log level configurable via config and environment

pub mod logging;

pub use logging::init_logging;
