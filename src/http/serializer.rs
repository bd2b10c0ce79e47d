//! C5's serialize half. Grounded on `original_source/src/core/feather.c`'s
//! `feather_dump_response`, including its exact status-reason table
//! (`"No content"` for 204, not `"No Content"`).

use std::io::{Cursor, Write};

use super::Response;

/// The fixed status-reason table. Unknown codes get an empty reason.
pub fn status_reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        204 => "No content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    }
}

/// Serializes `response` into `out`, returning the number of bytes written,
/// or `0` if `out` is too small. A `Content-Length` header is injected
/// automatically only if the caller hasn't already set one and the body is
/// non-empty — calling this twice on the same response is therefore
/// idempotent (SPEC_FULL §8).
///
/// On overflow the scratch buffer may hold a partial prefix, but the
/// connection driver never transmits a buffer whose serialization returned
/// `0`, so no half-response ever reaches the wire.
pub fn serialize_response(response: &Response<'_>, out: &mut [u8]) -> usize {
    let mut cursor = Cursor::new(out);

    let wrote = (|| -> std::io::Result<()> {
        write!(cursor, "HTTP/1.1 {} {}\r\n", response.status, status_reason(response.status))?;

        for (key, value) in response.headers.iter() {
            cursor.write_all(key)?;
            cursor.write_all(b": ")?;
            cursor.write_all(value)?;
            cursor.write_all(b"\r\n")?;
        }

        if response.headers.content_length.is_none() && !response.body.is_empty() {
            write!(cursor, "Content-Length: {}\r\n", response.body.len())?;
        }

        cursor.write_all(b"\r\n")?;
        cursor.write_all(response.body)?;
        Ok(())
    })();

    match wrote {
        Ok(()) => cursor.position() as usize,
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Headers;

    #[test]
    fn serializes_status_headers_and_body() {
        let mut response = Response::with_body(200, b"Hello, World!");
        let mut buf = [0u8; 256];
        let n = serialize_response(&response, &mut buf);
        assert_eq!(
            &buf[..n],
            b"HTTP/1.1 200 OK\r\nContent-Length: 13\r\n\r\nHello, World!".as_slice()
        );

        response.status = 204;
        let n = serialize_response(&response, &mut buf);
        assert!(&buf[..n].starts_with(b"HTTP/1.1 204 No content\r\n"));
    }

    #[test]
    fn unknown_status_gets_empty_reason() {
        let response = Response::new(799);
        let mut buf = [0u8; 64];
        let n = serialize_response(&response, &mut buf);
        assert_eq!(&buf[..n], b"HTTP/1.1 799 \r\n\r\n".as_slice());
    }

    #[test]
    fn does_not_double_inject_content_length() {
        let mut headers = Headers::new();
        headers.set(b"Content-Length", b"999");
        let response = Response {
            status: 200,
            headers,
            body: b"hi",
        };
        let mut buf = [0u8; 128];
        let n1 = serialize_response(&response, &mut buf);
        let first: Vec<u8> = buf[..n1].to_vec();
        let n2 = serialize_response(&response, &mut buf);
        assert_eq!(first, buf[..n2]);
        let needle = b"Content-Length: 999".as_slice();
        let occurrences = first.windows(needle.len()).filter(|w| *w == needle).count();
        assert_eq!(occurrences, 1);
    }

    #[test]
    fn overflow_returns_zero() {
        let response = Response::with_body(200, b"a body too long for a tiny buffer");
        let mut buf = [0u8; 4];
        assert_eq!(serialize_response(&response, &mut buf), 0);
    }
}
