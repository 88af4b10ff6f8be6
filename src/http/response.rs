//! Response assembly for buffered handlers.
//!
//! # Responsibilities
//! - Turn a completed handler buffer into a 200 response, byte for byte
//! - Pick a `Content-Type` from the first bytes of the body
//!
//! # Design Decisions
//! - Buffered handlers only see a writer, so the content type is sniffed:
//!   markup is HTML, other UTF-8 is plain text, the rest is binary

use axum::body::Body;
use axum::http::{header, HeaderValue};
use axum::response::Response;

/// Build the response for a buffered handler that succeeded.
pub fn buffered(body: Vec<u8>) -> Response {
    let content_type = sniff_content_type(&body);
    let mut response = Response::new(Body::from(body));
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Guess a content type from the leading bytes.
pub fn sniff_content_type(body: &[u8]) -> &'static str {
    let head = &body[..body.len().min(512)];
    let trimmed = head.trim_ascii_start();

    if trimmed.starts_with(b"<") {
        let lower = trimmed.to_ascii_lowercase();
        const MARKUP: [&[u8]; 5] = [b"<!doctype html", b"<html", b"<head", b"<body", b"<p>"];
        if MARKUP.iter().any(|tag| lower.starts_with(tag)) {
            return "text/html; charset=utf-8";
        }
        if lower.starts_with(b"<?xml") {
            return "text/xml; charset=utf-8";
        }
    }

    // A multi-byte character may straddle the 512-byte window.
    match std::str::from_utf8(head) {
        Ok(_) => "text/plain; charset=utf-8",
        Err(e) if e.error_len().is_none() => "text/plain; charset=utf-8",
        Err(_) => "application/octet-stream",
    }
}
