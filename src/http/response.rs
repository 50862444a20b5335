use std::collections::HashMap;

use tracing::warn;

pub const NOT_FOUND_BODY: &str = "404: Resource Not Found";
pub const INTERNAL_ERROR_BODY: &str = "500: Internal Server Error";
const BAD_REQUEST_BODY: &str = "400: Bad Request";

/// Statuses the guest book ever answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    NotFound,
    InternalServerError,
}

impl StatusCode {
    /// ```
    /// # use guestbook::http::response::StatusCode;
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::InternalServerError => "Internal Server Error",
        }
    }
}

/// The response a handler chain writes into.
///
/// Handlers set headers, write the body and end it. After `end` (or `send`)
/// the response is finished and every further mutation is dropped with a
/// warning, so the first handler to answer wins.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    finished: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// An empty, unfinished `200 OK`.
    pub fn new() -> Self {
        Self {
            status: StatusCode::Ok,
            headers: HashMap::new(),
            body: Vec::new(),
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn set_status(&mut self, status: StatusCode) {
        if self.finished {
            warn!(status = status.as_u16(), "Status set on a finished response, ignoring");
            return;
        }
        self.status = status;
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        if self.finished {
            warn!("Header set on a finished response, ignoring");
            return;
        }
        self.headers.insert(name.into(), value.into());
    }

    pub fn write(&mut self, chunk: impl AsRef<[u8]>) {
        if self.finished {
            warn!("Write after end, ignoring");
            return;
        }
        self.body.extend_from_slice(chunk.as_ref());
    }

    /// Marks the response finished, filling in `Content-Length`.
    pub fn end(&mut self) {
        if self.finished {
            return;
        }
        set_content_length(&mut self.headers, self.body.len());
        self.finished = true;
    }

    /// `set_status` + `write` + `end` in one go.
    pub fn send(&mut self, status: StatusCode, body: impl AsRef<[u8]>) {
        if self.finished {
            warn!(
                status = status.as_u16(),
                "Response already finished, dropping second send"
            );
            return;
        }
        self.set_status(status);
        self.write(body);
        self.end();
    }

    /// Header value by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .body(BAD_REQUEST_BODY.as_bytes().to_vec())
            .build()
    }

    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .body(NOT_FOUND_BODY.as_bytes().to_vec())
            .build()
    }

    pub fn internal_error() -> Self {
        ResponseBuilder::new(StatusCode::InternalServerError)
            .body(INTERNAL_ERROR_BODY.as_bytes().to_vec())
            .build()
    }
}

fn set_content_length(headers: &mut HashMap<String, String>, len: usize) {
    if !headers.keys().any(|k| k.eq_ignore_ascii_case("Content-Length")) {
        headers.insert("Content-Length".to_string(), len.to_string());
    }
}

/// Builds an already finished response in one expression.
///
/// ```
/// # use guestbook::http::response::{ResponseBuilder, StatusCode};
/// let res = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "application/json")
///     .body(b"[]".to_vec())
///     .build();
/// assert!(res.is_finished());
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(mut self) -> Response {
        set_content_length(&mut self.headers, self.body.len());
        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
            finished: true,
        }
    }
}
