//! Guest book error taxonomy.
//!
//! Each variant maps to one client-visible outcome. `NotFound` and
//! `Internal` become 404/500 responses in the handler that hit them.
//! `Persistence` is not converted: it is returned out of the handler chain
//! and the connection is dropped without a response.

use std::path::PathBuf;

use thiserror::Error;

use crate::http::response::{INTERNAL_ERROR_BODY, NOT_FOUND_BODY, StatusCode};

#[derive(Debug, Error)]
pub enum GuestBookError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(#[source] anyhow::Error),

    #[error("failed to persist {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GuestBookError {
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    /// Status and body sent for this error, if it is answered at all.
    pub fn status(&self) -> Option<(StatusCode, &'static str)> {
        match self {
            Self::NotFound(_) => Some((StatusCode::NotFound, NOT_FOUND_BODY)),
            Self::Internal(_) => Some((StatusCode::InternalServerError, INTERNAL_ERROR_BODY)),
            Self::Persistence { .. } => None,
        }
    }
}

impl From<serde_json::Error> for GuestBookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.into())
    }
}
