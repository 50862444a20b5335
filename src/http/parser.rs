use std::collections::HashMap;

use crate::http::request::{Extensions, Method, Request};

const HEADER_END: &[u8] = b"\r\n\r\n";

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    InvalidRequest,
    InvalidMethod,
    InvalidHeader,
    InvalidContentLength,
    /// More bytes are needed before a whole request is buffered.
    Incomplete,
}

/// Parses one request from the front of `buf`.
///
/// Returns the request and the number of bytes it occupied, so pipelined
/// requests stay in the buffer for the next call.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let head_len = buf
        .windows(HEADER_END.len())
        .position(|w| w == HEADER_END)
        .ok_or(ParseError::Incomplete)?;
    let head = std::str::from_utf8(&buf[..head_len]).map_err(|_| ParseError::InvalidRequest)?;

    let mut lines = head.split("\r\n");
    let (method, path, version) = parse_request_line(lines.next().unwrap_or_default())?;
    let headers = parse_headers(lines)?;

    let body_start = head_len + HEADER_END.len();
    let body_len = declared_length(&headers)?;
    let body_end = body_start
        .checked_add(body_len)
        .ok_or(ParseError::InvalidContentLength)?;
    let body = buf
        .get(body_start..body_end)
        .ok_or(ParseError::Incomplete)?
        .to_vec();

    let request = Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body,
        extensions: Extensions::new(),
    };
    Ok((request, body_end))
}

fn parse_request_line(line: &str) -> Result<(Method, &str, &str), ParseError> {
    let mut parts = line.split_whitespace();
    let (Some(method), Some(path), Some(version)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::InvalidRequest);
    };
    let method = Method::from_str(method).ok_or(ParseError::InvalidMethod)?;
    Ok((method, path, version))
}

fn parse_headers<'a>(
    lines: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, String>, ParseError> {
    let mut headers = HashMap::new();
    for line in lines.filter(|l| !l.is_empty()) {
        let (name, value) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;
        headers.insert(name.trim().to_string(), value.trim().to_string());
    }
    Ok(headers)
}

fn declared_length(headers: &HashMap<String, String>) -> Result<usize, ParseError> {
    match headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("Content-Length"))
    {
        Some((_, v)) => v.parse().map_err(|_| ParseError::InvalidContentLength),
        None => Ok(0),
    }
}
