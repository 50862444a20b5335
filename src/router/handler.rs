//! Handler trait and the continuation signal.
//!
//! A handler receives the injected application state, the request and the
//! response being built. It answers with a [`Flow`]: `Continue` hands the
//! request to the next matching entry, `Finalized` stops the chain.
//!
//! Handlers are plain functions returning a boxed future:
//!
//! ```ignore
//! fn hello<'a>(
//!     _state: &'a AppState,
//!     _req: &'a mut Request,
//!     res: &'a mut Response,
//! ) -> BoxFuture<'a, HandlerResult> {
//!     Box::pin(async move {
//!         res.send(StatusCode::Ok, "hello");
//!         Ok(Flow::Finalized)
//!     })
//! }
//! ```

use std::future::Future;
use std::pin::Pin;

use crate::http::request::Request;
use crate::http::response::Response;

/// A heap-allocated future borrowing from the handler's arguments.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a handler produces. Errors are not caught by the router.
pub type HandlerResult = anyhow::Result<Flow>;

/// Whether dispatch proceeds past a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next matching entry.
    Continue,
    /// The handler owns the response; stop here.
    Finalized,
}

/// Implemented for every function usable as a route handler.
pub trait Handler<S>: Send + Sync + 'static {
    fn call<'a>(
        &'a self,
        state: &'a S,
        req: &'a mut Request,
        res: &'a mut Response,
    ) -> BoxFuture<'a, HandlerResult>;
}

impl<S, F> Handler<S> for F
where
    F: for<'a> Fn(&'a S, &'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        state: &'a S,
        req: &'a mut Request,
        res: &'a mut Response,
    ) -> BoxFuture<'a, HandlerResult> {
        (self)(state, req, res)
    }
}
