//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (root strip + preprocessing hook for API paths)
//!     → registry.rs (route table for the method)
//!     → matcher.rs (exact template, else wildcard templates)
//!     → Return: Handler + Params, or a dispatch error
//!
//! Route Compilation (at startup):
//!     RouterBuilder::handle / file_serve
//!     → Compile templates (literal prefix, segments)
//!     → Freeze as immutable AppRouter
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix + segment comparison only)
//! - Deterministic: overlapping wildcard templates resolve in
//!   registration order
//! - Exact templates always win over wildcard templates

pub mod matcher;
pub mod registry;
pub mod router;

pub use matcher::RouteTemplate;
pub use registry::{Registry, RouteTable};
pub use router::{panic_message, AppRouter, PanicHandler, RequestHead, RouterBuilder, Wrapper};
