//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, fallback to the router)
//!     → request.rs (request ID)
//!     → routing::AppRouter::dispatch
//!         → handler.rs (buffered App handler | raw File handler)
//!         → response.rs (buffered body) / files.rs (file body)
//!         → error.rs (status + plain-text error body)
//!     → Send to client
//! ```

pub mod error;
pub mod files;
pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use error::AppError;
pub use files::{DirProvider, FileProvider, MemoryProvider};
pub use handler::{AppHandle, FileHandle, Handler, Params};
pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
