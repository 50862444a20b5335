//! MIME type detection for static files.

use std::path::Path;

/// Content-Type for a file extension.
///
/// ```
/// use guestbook::http::mime::content_type;
/// assert_eq!(content_type(Some("html")), "text/html; charset=utf-8");
/// assert_eq!(content_type(None), "application/octet-stream");
/// ```
pub fn content_type(extension: Option<&str>) -> &'static str {
    match extension {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt") => "text/plain; charset=utf-8",
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Content-Type for a path, by its extension.
pub fn content_type_for_path(path: &str) -> &'static str {
    content_type(Path::new(path).extension().and_then(|e| e.to_str()))
}
