//! Static file serving.
//!
//! # Responsibilities
//! - Abstract "open by path" behind `FileProvider`
//! - Serve files from a directory or from memory
//! - Map provider failures onto HTTP status codes
//!
//! # Design Decisions
//! - The request path is served as-is relative to the provider root,
//!   so `/js/lib/app.js` reads `<root>/js/lib/app.js`
//! - `..` components are rejected before touching the filesystem
//! - A trailing `/` serves `index.html`

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;

use crate::http::error::AppError;
use crate::http::handler::Handler;

/// Source of file contents, addressed by request path.
#[async_trait]
pub trait FileProvider: Send + Sync {
    /// Read the whole file at `path` (a `/`-rooted, percent-encoded URL path).
    async fn open(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Serves files below a directory on disk.
#[derive(Debug, Clone)]
pub struct DirProvider {
    root: PathBuf,
}

impl DirProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

}

#[async_trait]
impl FileProvider for DirProvider {
    async fn open(&self, path: &str) -> io::Result<Vec<u8>> {
        let relative = sanitize_path(path)?;
        tokio::fs::read(self.root.join(relative)).await
    }
}

/// Serves files from an in-memory map keyed by URL path.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file under its decoded path, e.g. `/hello world.txt`.
    /// `path` is normalized to start with `/`.
    pub fn with_file(mut self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        let key = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        self.files.insert(key, contents.into());
        self
    }
}

#[async_trait]
impl FileProvider for MemoryProvider {
    async fn open(&self, path: &str) -> io::Result<Vec<u8>> {
        let key = format!("/{}", sanitize_path(path)?.display());
        self.files
            .get(&key)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, key))
    }
}

/// Decode a URL path into a relative filesystem path, refusing traversal.
fn sanitize_path(path: &str) -> io::Result<PathBuf> {
    let decoded = percent_encoding::percent_decode_str(path.trim_start_matches('/'))
        .decode_utf8()
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "invalid UTF-8 in path"))?;

    let relative = Path::new(decoded.as_ref());
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "directory traversal not allowed",
                ))
            }
        }
    }
    Ok(relative.to_path_buf())
}

/// The raw handler bound by `RouterBuilder::file_serve`.
pub fn file_handler() -> Handler {
    Handler::file(|req, fs| -> BoxFuture<'static, Response> { Box::pin(serve_file(req, fs)) })
}

/// Serve the request path from `fs`.
pub async fn serve_file(req: Request<Body>, fs: Arc<dyn FileProvider>) -> Response {
    let mut path = req.uri().path().to_string();
    if path.ends_with('/') {
        path.push_str("index.html");
    }

    match fs.open(&path).await {
        Ok(contents) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            let mut response = Response::new(Body::from(contents));
            if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
                response.headers_mut().insert(header::CONTENT_TYPE, value);
            }
            response
        }
        Err(e) => {
            let code = match e.kind() {
                io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
                io::ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
                io::ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::debug!(path = %path, error = %e, status = %code, "File not served");
            let message = code.canonical_reason().unwrap_or("file error");
            AppError::new(code, message).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/js/lib/app.js").unwrap(),
            PathBuf::from("js/lib/app.js")
        );
        assert_eq!(
            sanitize_path("/hello%20world.txt").unwrap(),
            PathBuf::from("hello world.txt")
        );

        assert!(sanitize_path("/../../etc/passwd").is_err());
        assert!(sanitize_path("/static/%2e%2e/secret").is_err());
    }

    #[tokio::test]
    async fn test_dir_provider_reads_below_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("test.html"), "<p>hi</p>").unwrap();

        let provider = DirProvider::new(dir.path());
        assert_eq!(provider.open("/test.html").await.unwrap(), b"<p>hi</p>");

        let missing = provider.open("/nope.html").await.unwrap_err();
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_providers_agree_on_encoded_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello world.txt"), "hi").unwrap();

        let on_disk = DirProvider::new(dir.path());
        let in_memory = MemoryProvider::new().with_file("/hello world.txt", "hi");
        assert_eq!(on_disk.open("/hello%20world.txt").await.unwrap(), b"hi");
        assert_eq!(in_memory.open("/hello%20world.txt").await.unwrap(), b"hi");
        assert_eq!(in_memory.open("/hello world.txt").await.unwrap(), b"hi");
    }

    #[tokio::test]
    async fn test_serve_file_sets_content_type() {
        let fs: Arc<dyn FileProvider> =
            Arc::new(MemoryProvider::new().with_file("/css/site.css", "body {}"));

        let req = Request::builder().uri("/css/site.css").body(Body::empty()).unwrap();
        let response = serve_file(req, fs.clone()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");

        let req = Request::builder().uri("/css/missing.css").body(Body::empty()).unwrap();
        let response = serve_file(req, fs).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_trailing_slash_serves_index() {
        let fs: Arc<dyn FileProvider> =
            Arc::new(MemoryProvider::new().with_file("/docs/index.html", "<h1>docs</h1>"));

        let req = Request::builder().uri("/docs/").body(Body::empty()).unwrap();
        let response = serve_file(req, fs).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"<h1>docs</h1>");
    }
}
