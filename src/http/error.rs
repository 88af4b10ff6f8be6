//! Dispatch error type.
//!
//! # Responsibilities
//! - Carry an HTTP status alongside a failure description
//! - Map every untyped failure to 500 Internal Server Error
//! - Render the client-visible error response (status + plain-text body)
//!
//! # Design Decisions
//! - Only `AppError::Status` carries a status; everything else is a server error
//! - The body is the error's `Display` text, never JSON

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// A failure surfaced by the preprocessing hook, the lookup, or a handler.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failure with an explicit HTTP status.
    #[error("{message}")]
    Status { code: StatusCode, message: String },

    /// Writing into the response buffer failed.
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other failure; always reported as 500.
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
    /// Create an error carrying the given status.
    ///
    /// ```
    /// use approuter::http::AppError;
    /// use axum::http::StatusCode;
    ///
    /// let err = AppError::new(StatusCode::BAD_REQUEST, "BadRequest. Token is empty.");
    /// assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    /// ```
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        AppError::Status {
            code,
            message: message.into(),
        }
    }

    /// Wrap an arbitrary error; it will be reported as 500.
    pub fn other<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        AppError::Other(err.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Status sent to the client for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Status { code, .. } => *code,
            AppError::Io(_) | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    /// Render as a plain-text response: status line, then the description.
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = Response::new(Body::from(self.to_string()));
        *response.status_mut() = status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }
}

/// Shorthand for `AppError::new(code, format!(...))`.
#[macro_export]
macro_rules! app_error {
    ($code:expr, $($arg:tt)+) => {
        $crate::http::AppError::new($code, format!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_server_error() {
        let err = AppError::other("database unavailable");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "database unavailable");

        let err = AppError::from(std::io::Error::other("broken pipe"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_typed_status_is_kept() {
        let err = app_error!(StatusCode::FORBIDDEN, "user {} is locked", "alice");
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "user alice is locked");
    }

    #[tokio::test]
    async fn test_into_response_writes_plain_text() {
        let response = AppError::unauthorized("Token is empty").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Token is empty");
    }
}
