use std::io::Write;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Wire form of `resp`: status line, headers, blank line, body.
///
/// `Content-Length` is added when the response does not carry one yet.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128 + resp.body.len());

    // Writes into a Vec cannot fail.
    let _ = write!(
        buf,
        "{HTTP_VERSION} {} {}\r\n",
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    for (name, value) in &resp.headers {
        let _ = write!(buf, "{name}: {value}\r\n");
    }
    if resp.header("Content-Length").is_none() {
        let _ = write!(buf, "Content-Length: {}\r\n", resp.body.len());
    }
    buf.extend_from_slice(b"\r\n");
    buf.extend_from_slice(&resp.body);

    buf
}

/// A serialized response and how much of it reached the client.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.written
    }

    /// Writes what is left, resuming after partial writes, then flushes.
    pub async fn write_to_stream<W: AsyncWrite + Unpin>(
        &mut self,
        stream: &mut W,
    ) -> anyhow::Result<()> {
        while self.remaining() > 0 {
            let n = stream.write(&self.buffer[self.written..]).await?;
            if n == 0 {
                anyhow::bail!("connection closed while writing");
            }
            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
