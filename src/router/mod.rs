//! Ordered middleware router.
//!
//! Entries are kept in registration order. Each carries an optional method
//! and an optional path; a missing filter matches anything. Dispatch walks
//! every entry in order and runs each one whose filters match, until a
//! handler returns [`Flow::Finalized`].
//!
//! ```text
//!   use(load_comments)          ─┐
//!   use(log_request)             │ every request
//!   post("/guest_book", ..)      │ only POST /guest_book
//!   get("/comments", ..)         │ only GET /comments
//!   use(serve_file)             ─┘ catch-all, registered last
//! ```
//!
//! Matching is not short-circuited: a handler that ends the response but
//! still returns `Continue` lets later matching entries run against the
//! finished response. Those writes are dropped by [`Response`] and the
//! router logs a warning for each such invocation.

pub mod handler;

pub use handler::{BoxFuture, Flow, Handler, HandlerResult};

use crate::http::request::{Method, Request};
use crate::http::response::Response;

/// A registered (method, path, handler) triple.
pub struct RouteEntry<S> {
    method: Option<Method>,
    path: Option<String>,
    handler: Box<dyn Handler<S>>,
}

impl<S> RouteEntry<S> {
    pub fn method(&self) -> Option<Method> {
        self.method
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// `(method unset OR equal) AND (path unset OR equal)`.
    pub fn matches(&self, req: &Request) -> bool {
        self.method.is_none_or(|m| m == req.method)
            && self.path.as_deref().is_none_or(|p| p == req.path)
    }
}

/// The application router, generic over the state handed to every handler.
pub struct Router<S> {
    entries: Vec<RouteEntry<S>>,
}

impl<S: 'static> Default for Router<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> Router<S> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Registers unconditional middleware.
    pub fn use_middleware(self, handler: impl Handler<S>) -> Self {
        self.add(None, None, handler)
    }

    /// Registers a handler for one path, any method.
    pub fn use_at(self, path: &str, handler: impl Handler<S>) -> Self {
        self.add(None, Some(path), handler)
    }

    pub fn get(self, path: &str, handler: impl Handler<S>) -> Self {
        self.add(Some(Method::GET), Some(path), handler)
    }

    pub fn post(self, path: &str, handler: impl Handler<S>) -> Self {
        self.add(Some(Method::POST), Some(path), handler)
    }

    fn add(mut self, method: Option<Method>, path: Option<&str>, handler: impl Handler<S>) -> Self {
        self.entries.push(RouteEntry {
            method,
            path: path.map(str::to_owned),
            handler: Box::new(handler),
        });
        self
    }

    pub fn entries(&self) -> &[RouteEntry<S>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs `req` through every matching entry in registration order.
    ///
    /// Returns `Flow::Finalized` as soon as a handler does, or
    /// `Flow::Continue` when the chain ran out. Handler errors propagate
    /// unchanged.
    pub async fn handle_request(
        &self,
        state: &S,
        req: &mut Request,
        res: &mut Response,
    ) -> HandlerResult {
        for (index, entry) in self.entries.iter().enumerate() {
            if !entry.matches(req) {
                continue;
            }

            if res.is_finished() {
                tracing::warn!(
                    entry = index,
                    method = %req.method,
                    path = %req.path,
                    "handler invoked after the response was finished"
                );
            }

            match entry.handler.call(state, req, res).await? {
                Flow::Continue => continue,
                Flow::Finalized => return Ok(Flow::Finalized),
            }
        }

        Ok(Flow::Continue)
    }
}
