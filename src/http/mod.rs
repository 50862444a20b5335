//! Minimal HTTP/1.1 plumbing for the guest book.
//!
//! Bytes from the socket are parsed into a [`request::Request`], pushed
//! through the [`App`](crate::server::App) router and the finished
//! [`response::Response`] goes back on the same connection.
//!
//! - **`connection`**: per-client loop over one socket
//! - **`parser`**: request line, headers and `Content-Length` body
//! - **`request`**: request type, builder, per-request extensions
//! - **`response`**: mutable response that handlers write into
//! - **`writer`**: wire serialization
//! - **`mime`**: `Content-Type` lookup by file extension
//!
//! A connection cycles through its states until the client hangs up:
//!
//! ```text
//! Reading ──request──▶ Processing ──response──▶ Writing ──keep-alive──▶ Reading
//!    │                     │                       │
//!    │ malformed: 400      │ chain error           └──close──▶ Closed
//!    └──▶ Writing, close   └──▶ Closed (no response)
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
