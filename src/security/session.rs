//! Bearer-token preprocessing hook.
//!
//! # Responsibilities
//! - Reject API requests without `Authorization: Bearer <key>` (401)
//! - Attach a `Session` to the request extensions for handlers
//!
//! # Design Decisions
//! - The path is returned unchanged; this hook only authenticates
//! - The token is never logged

use axum::body::Body;
use axum::http::{header, Request};

use crate::http::AppError;

/// Attached to requests that passed `bearer_auth`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Path the hook saw, relative to the router root.
    pub path: String,
}

/// Build a preprocessing hook requiring the given bearer token.
pub fn bearer_auth(
    api_key: impl Into<String>,
) -> impl Fn(&mut Request<Body>, &str) -> Result<String, AppError> + Send + Sync + 'static {
    let expected = format!("Bearer {}", api_key.into());
    move |req: &mut Request<Body>, path: &str| {
        let authorized = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .is_some_and(|value| value == expected);

        if !authorized {
            tracing::warn!(path = %path, "Rejected API request without valid token");
            return Err(AppError::unauthorized("BadRequest. Token is empty or invalid."));
        }

        req.extensions_mut().insert(Session {
            path: path.to_string(),
        });
        Ok(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_bearer_auth() {
        let hook = bearer_auth("s3cret");

        let mut req = Request::builder()
            .header("Authorization", "Bearer s3cret")
            .body(Body::empty())
            .unwrap();
        assert_eq!(hook(&mut req, "/api/me").unwrap(), "/api/me");
        assert_eq!(
            req.extensions().get::<Session>(),
            Some(&Session { path: "/api/me".to_string() })
        );

        let mut req = Request::builder()
            .header("Authorization", "Bearer wrong")
            .body(Body::empty())
            .unwrap();
        let err = hook(&mut req, "/api/me").unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(req.extensions().get::<Session>().is_none());

        let mut req = Request::new(Body::empty());
        assert!(hook(&mut req, "/api/me").is_err());
    }
}
