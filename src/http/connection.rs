use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::server::App;

const READ_CHUNK: usize = 4096;

/// One client stream, served request by request until it closes.
pub struct Connection<T, S> {
    stream: T,
    buffer: BytesMut,
    state: ConnectionState,
    app: Arc<App<S>>,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

/// Outcome of waiting for the next request.
enum Incoming {
    Request(Request),
    Malformed(ParseError),
    Eof,
}

impl<T, S> Connection<T, S>
where
    T: AsyncRead + AsyncWrite + Unpin,
    S: Send + Sync + 'static,
{
    pub fn new(stream: T, app: Arc<App<S>>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Reading,
            app,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Incoming::Request(req) => ConnectionState::Processing(req),
                        Incoming::Malformed(e) => {
                            tracing::warn!(error = ?e, "Malformed request, closing connection");
                            let response = Response::bad_request();
                            ConnectionState::Writing(ResponseWriter::new(&response), false)
                        }
                        Incoming::Eof => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let keep_alive = req.keep_alive();
                    let (method, path) = (req.method, req.path.clone());

                    match self.app.dispatch(req).await {
                        Ok(response) => {
                            tracing::debug!(
                                method = %method,
                                path = %path,
                                status = response.status.as_u16(),
                                "Response ready"
                            );
                            let writer = ResponseWriter::new(&response);
                            self.state = ConnectionState::Writing(writer, keep_alive);
                        }
                        Err(e) => {
                            // The handler chain died; the client gets nothing.
                            tracing::error!(
                                method = %method,
                                path = %path,
                                error = %e,
                                "Handler chain failed, dropping connection"
                            );
                            self.state = ConnectionState::Closed;
                        }
                    }
                }

                ConnectionState::Writing(mut writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    self.state = if keep_alive {
                        ConnectionState::Reading
                    } else {
                        ConnectionState::Closed
                    };
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    async fn read_request(&mut self) -> anyhow::Result<Incoming> {
        loop {
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(Incoming::Request(request));
                }

                Err(ParseError::Incomplete) => {}

                Err(e) => return Ok(Incoming::Malformed(e)),
            }

            self.buffer.reserve(READ_CHUNK);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                // Client closed connection
                return Ok(Incoming::Eof);
            }
        }
    }
}
