//! Guestbook - a small guest book web server
//!
//! Core library: HTTP layer, middleware router and the guest book
//! application built on them.

pub mod config;
pub mod error;
pub mod guestbook;
pub mod http;
pub mod router;
pub mod server;
