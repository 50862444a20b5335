//! TCP server and the router/state pair it serves.

pub mod listener;

use crate::http::request::Request;
use crate::http::response::Response;
use crate::router::{Flow, Router};

/// A router together with the state injected into its handlers.
pub struct App<S> {
    pub router: Router<S>,
    pub state: S,
}

impl<S: 'static> App<S> {
    pub fn new(router: Router<S>, state: S) -> Self {
        Self { router, state }
    }

    /// Runs one request through the router and returns the response to send.
    ///
    /// When the chain runs out without finishing the response, the client
    /// gets a 404. Handler errors are returned unchanged.
    pub async fn dispatch(&self, mut req: Request) -> anyhow::Result<Response> {
        let mut res = Response::new();
        let flow = self
            .router
            .handle_request(&self.state, &mut req, &mut res)
            .await?;

        if flow == Flow::Continue && !res.is_finished() {
            tracing::warn!(
                method = %req.method,
                path = %req.path,
                "No handler finished the response, sending 404"
            );
            return Ok(Response::not_found());
        }

        res.end();
        Ok(res)
    }
}
