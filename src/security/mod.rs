//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! API request (path under root + api_prefix)
//!     → session.rs (bearer token check, attach Session)
//!     → routing lookup with the rewritten path
//! ```
//!
//! # Design Decisions
//! - Authentication runs as the router's preprocessing hook, before lookup
//! - Non-API paths (static files, pages) are never checked

pub mod session;

pub use session::{bearer_auth, Session};
