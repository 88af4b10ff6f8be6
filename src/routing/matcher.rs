//! Route template compilation and matching.
//!
//! # Responsibilities
//! - Compile a template string (`/latest/:entry/:offset`) once at registration
//! - Test a concrete path against a compiled template
//! - Extract wildcard values into `Params`
//!
//! # Design Decisions
//! - A wildcard is a segment starting with `:`
//! - Prefix check uses the text before the first `:` in the template
//! - Segment counts must be equal; literal segments after the prefix are
//!   not compared again
//! - No regex in the hot path

use crate::http::Params;

/// Wildcard marker.
pub const WILDCARD: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal,
    Wildcard(String),
}

/// A compiled route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    raw: String,
    /// Byte offset of the first wildcard marker, if any.
    wildcard_at: Option<usize>,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let wildcard_at = raw.find(WILDCARD);
        let segments = split_segments(&raw)
            .map(|part| match part.strip_prefix(WILDCARD) {
                Some(name) => Segment::Wildcard(name.to_string()),
                None => Segment::Literal,
            })
            .collect();

        Self {
            raw,
            wildcard_at,
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn has_wildcard(&self) -> bool {
        self.wildcard_at.is_some()
    }

    /// Text before the first wildcard marker (the whole template if none).
    pub fn literal_prefix(&self) -> &str {
        match self.wildcard_at {
            Some(idx) => &self.raw[..idx],
            None => &self.raw,
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Match `path` against this wildcard template.
    ///
    /// Returns `None` for templates without wildcards; those only match
    /// through the registry's exact lookup.
    pub fn capture(&self, path: &str) -> Option<Params> {
        self.wildcard_at?;
        if !path.starts_with(self.literal_prefix()) {
            return None;
        }

        let parts: Vec<&str> = split_segments(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, value) in self.segments.iter().zip(parts) {
            if let Segment::Wildcard(name) = segment {
                params.insert(name.as_str(), value);
            }
        }
        Some(params)
    }
}

/// Segments after the leading root separator.
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').skip(1)
}
