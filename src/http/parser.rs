//! C5's parse half. Grounded on `original_source/src/core/feather.c`'s
//! `feather_parse_request` — this is a direct Rust rendition of that
//! algorithm over borrowed byte slices instead of `StrView`s.

use crate::util::FixedVec;

use super::bytes::split_once;
use super::{Headers, Method, Request};

/// Why [`parse_request`] rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpError {
    /// No CRLF-terminated request line, or an empty HTTP-version token.
    Malformed,
}

/// Parses the request line and header section out of `buf`. `buf` must
/// already contain the full header section (through the `\r\n\r\n`
/// terminator) — SPEC_FULL §4.7 has the connection driver scan for that
/// terminator before ever calling this. Whatever bytes follow the blank
/// line become the (possibly partial, to be extended by the driver) body
/// view.
pub fn parse_request(buf: &[u8]) -> Result<Request<'_>, HttpError> {
    let (line, rest, found_line) = split_once(buf, b"\r\n");
    if !found_line {
        return Err(HttpError::Malformed);
    }

    let (method_bytes, after_method, _) = split_once(line, b" ");
    let (path, version, _) = split_once(after_method, b" ");
    if version.is_empty() {
        return Err(HttpError::Malformed);
    }

    let method = Method::from_bytes(method_bytes);
    let mut headers = Headers::new();
    let mut remaining = rest;

    let body = loop {
        let (chunk, next, found) = split_once(remaining, b"\r\n");
        if !found {
            return Err(HttpError::Malformed);
        }

        if chunk.is_empty() {
            break next;
        }

        if let Some(colon) = chunk.iter().position(|&b| b == b':') {
            let key = &chunk[..colon];
            let mut value = &chunk[colon + 1..];
            if value.first() == Some(&b' ') {
                value = &value[1..];
            }
            headers.set(key, value);
        }
        remaining = next;
    };

    Ok(Request {
        method,
        path,
        params: FixedVec::new(),
        headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_request_line_headers_and_body() {
        let raw = b"POST /echo HTTP/1.1\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello";
        let req = parse_request(raw).unwrap();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.path, b"/echo");
        assert_eq!(req.headers.content_type, Some(b"text/plain".as_slice()));
        assert_eq!(req.headers.content_length, Some(b"5".as_slice()));
        assert_eq!(req.body, b"hello");
    }

    #[test]
    fn request_with_no_body_is_still_valid() {
        let req = parse_request(b"GET /home HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, b"/home");
        assert_eq!(req.body, b"");
    }

    #[test]
    fn duplicate_well_known_header_last_wins() {
        let raw = b"GET / HTTP/1.1\r\nConnection: keep-alive\r\nConnection: close\r\n\r\n";
        let req = parse_request(raw).unwrap();
        assert_eq!(req.headers.connection, Some(b"close".as_slice()));
    }

    #[test]
    fn header_line_without_colon_is_skipped() {
        let raw = b"GET / HTTP/1.1\r\nmalformed-header-line\r\nX-Ok: yes\r\n\r\n";
        let req = parse_request(raw).unwrap();
        assert_eq!(req.headers.get(b"X-Ok"), Some(b"yes".as_slice()));
    }

    #[test]
    fn only_a_single_leading_space_is_trimmed_from_values() {
        let raw = b"GET / HTTP/1.1\r\nX-Pad:   3 spaces\r\n\r\n";
        let req = parse_request(raw).unwrap();
        assert_eq!(req.headers.get(b"X-Pad"), Some(b"  3 spaces".as_slice()));
    }

    #[test]
    fn missing_version_is_malformed() {
        assert!(matches!(parse_request(b"GET /\r\n\r\n"), Err(HttpError::Malformed)));
    }

    #[test]
    fn missing_request_line_terminator_is_malformed() {
        assert!(matches!(parse_request(b"GET / HTTP/1.1"), Err(HttpError::Malformed)));
    }
}
