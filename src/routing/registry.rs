//! Per-method handler registry.
//!
//! # Responsibilities
//! - Store handlers under (method, template)
//! - Resolve a method to its route table
//! - Look up a path: exact template first, then wildcard templates
//!
//! # Design Decisions
//! - Registration replaces an existing (method, template) entry in place
//! - Wildcard templates are scanned in registration order, so overlapping
//!   templates resolve deterministically
//! - A method is only known once a route has been registered for it

use std::collections::HashMap;

use axum::http::Method;

use crate::http::{Handler, Params};
use crate::routing::matcher::RouteTemplate;

/// A registered route.
#[derive(Debug, Clone)]
pub struct Route {
    pub template: RouteTemplate,
    pub handler: Handler,
}

/// Routes registered for one method.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    /// Template string -> index into `routes`.
    index: HashMap<String, usize>,
}

impl RouteTable {
    /// Insert or replace the handler for `template`.
    pub fn insert(&mut self, template: &str, handler: Handler) {
        if let Some(&idx) = self.index.get(template) {
            self.routes[idx].handler = handler;
            return;
        }

        let template = RouteTemplate::new(template);
        if template.has_wildcard() {
            if let Some(existing) = self.find_conflict(&template) {
                tracing::warn!(
                    template = %template.as_str(),
                    conflicts_with = %existing.as_str(),
                    "Ambiguous wildcard template; the earlier registration wins"
                );
            }
        }

        self.index
            .insert(template.as_str().to_string(), self.routes.len());
        self.routes.push(Route { template, handler });
    }

    /// Another wildcard template with the same prefix and segment count.
    fn find_conflict(&self, template: &RouteTemplate) -> Option<&RouteTemplate> {
        self.routes
            .iter()
            .map(|r| &r.template)
            .filter(|t| t.has_wildcard())
            .find(|t| {
                t.literal_prefix() == template.literal_prefix()
                    && t.segment_count() == template.segment_count()
            })
    }

    pub fn get(&self, template: &str) -> Option<&Handler> {
        self.index.get(template).map(|&idx| &self.routes[idx].handler)
    }

    /// Find the handler for a concrete path.
    pub fn find(&self, path: &str) -> Option<(&Handler, Params)> {
        if let Some(handler) = self.get(path) {
            return Some((handler, Params::new()));
        }

        self.routes.iter().find_map(|route| {
            route
                .template
                .capture(path)
                .map(|params| (&route.handler, params))
        })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn templates(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.template.as_str())
    }
}

/// Route tables keyed by HTTP method.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    trees: HashMap<Method, RouteTable>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, method: Method, template: &str, handler: Handler) {
        tracing::debug!(method = %method, template = %template, "Registering route");
        self.trees.entry(method).or_default().insert(template, handler);
    }

    /// Route table for `method`, or `None` if the method has no routes.
    pub fn lookup(&self, method: &Method) -> Option<&RouteTable> {
        self.trees.get(method)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.trees.keys()
    }
}
