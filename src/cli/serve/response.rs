//! HTTP response handlers.

use crate::core::encode_path;
use crate::resolve::SiteLayout;
use anyhow::{Context, Result};
use std::{fs, path::Path};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Respond with a static file, streamed from disk.
pub fn respond_file(request: Request, path: &Path, layout: &SiteLayout) -> Result<()> {
    let content_type = crate::utils::mime::from_path(path);

    // The file was just resolved, but it can vanish before we answer
    let Ok(metadata) = fs::metadata(path) else {
        return respond_not_found(request, layout);
    };
    let file_size = metadata.len();

    if is_head_request(&request) {
        return send_head(request, 200, content_type, Some(file_size));
    }

    // Check for Range header (video/audio seeking)
    if file_size > 0
        && let Some(range) = get_range_header(&request)
    {
        return respond_range(request, path, content_type, &range, file_size);
    }

    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let response =
        Response::from_file(file).with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

/// Handle Range request for media files (video/audio seeking).
fn respond_range(
    request: Request,
    path: &Path,
    content_type: &'static str,
    range: &str,
    file_size: u64,
) -> Result<()> {
    use std::io::{Read, Seek, SeekFrom};

    let range = range.strip_prefix("bytes=").unwrap_or(range);
    let (start, end) = parse_range(range, file_size);

    if start >= file_size || start > end {
        let content_range = format!("bytes */{file_size}");
        let response = Response::empty(StatusCode(416))
            .with_header(make_header_bytes("Content-Range", content_range.as_bytes()));
        request.respond(response)?;
        return Ok(());
    }

    let length = end - start + 1;

    // Stream the requested range - no memory allocation for large ranges
    let mut file = fs::File::open(path)?;
    file.seek(SeekFrom::Start(start))?;
    let reader = file.take(length);

    let content_range = format!("bytes {}-{}/{}", start, end, file_size);
    let response = Response::new(
        StatusCode(206),
        vec![
            Header::from_bytes("Content-Type", content_type).unwrap(),
            Header::from_bytes("Content-Range", content_range.as_bytes()).unwrap(),
            Header::from_bytes("Accept-Ranges", "bytes").unwrap(),
        ],
        reader,
        Some(length as usize),
        None,
    );

    request.respond(response)?;
    Ok(())
}

/// Parse a Range header value "start-end" into inclusive byte offsets.
///
/// Callers guarantee `file_size > 0` and issue the 416 when the result
/// is out of range.
fn parse_range(range: &str, file_size: u64) -> (u64, u64) {
    let last = file_size - 1;
    let parts: Vec<&str> = range.trim().split('-').collect();

    match parts.as_slice() {
        // "0-499" - specific range
        [s, e] if !s.is_empty() && !e.is_empty() => {
            let start = s.trim().parse().unwrap_or(0);
            let end: u64 = e.trim().parse().unwrap_or(last);
            (start, end.min(last))
        }
        // "500-" - from offset to end
        [s, ""] if !s.is_empty() => (s.trim().parse().unwrap_or(0), last),
        // "-500" - last 500 bytes
        ["", e] if !e.is_empty() => {
            let suffix: u64 = e.trim().parse().unwrap_or(0);
            (file_size.saturating_sub(suffix), last)
        }
        _ => (0, last),
    }
}

/// Extract Range header from request.
fn get_range_header(request: &Request) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case("range"))
        .map(|h| h.value.to_string())
}

/// Respond with a 301, carrying the query string through unchanged.
pub fn respond_redirect(request: Request, location: &str, query: &str) -> Result<()> {
    let mut target = encode_path(location);
    if !query.is_empty() {
        target.push('?');
        target.push_str(query);
    }

    let response = Response::empty(StatusCode(301))
        .with_header(make_header_bytes("Location", target.as_bytes()));
    request.respond(response)?;
    Ok(())
}

/// Respond with 404 page (custom or default).
pub fn respond_not_found(request: Request, layout: &SiteLayout) -> Result<()> {
    use crate::utils::mime::types::{HTML, PLAIN};

    let custom_404 = layout.content_root().join("404.html");
    let has_custom = custom_404.is_file();

    if is_head_request(&request) {
        let mime = if has_custom { HTML } else { PLAIN };
        return send_head(request, 404, mime, None);
    }

    if has_custom
        && let Ok(body) = fs::read(&custom_404)
    {
        return send_body(request, 404, HTML, body);
    }

    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    use crate::utils::mime::types::PLAIN;
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(
    request: Request,
    status: u16,
    content_type: &'static str,
    length: Option<u64>,
) -> Result<()> {
    let mut response =
        Response::empty(StatusCode(status)).with_header(make_header("Content-Type", content_type));
    if let Some(length) = length {
        // tiny_http folds this header into the declared body length
        response = response
            .with_header(make_header_bytes("Content-Length", length.to_string().as_bytes()));
    }
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}

fn make_header_bytes(key: &'static str, value: &[u8]) -> Header {
    Header::from_bytes(key, value).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_forms() {
        assert_eq!(parse_range("0-499", 1000), (0, 499));
        assert_eq!(parse_range("500-", 1000), (500, 999));
        assert_eq!(parse_range("-500", 1000), (500, 999));
        assert_eq!(parse_range("0-", 1000), (0, 999));
        // End past the file is clamped
        assert_eq!(parse_range("0-99999", 1000), (0, 999));
        // Suffix longer than the file means the whole file
        assert_eq!(parse_range("-99999", 1000), (0, 999));
        assert_eq!(parse_range("garbage", 1000), (0, 999));
    }

    #[test]
    fn test_parse_range_unsatisfiable() {
        // Start beyond the end of the file; respond_range answers 416
        let (start, _) = parse_range("1000-", 1000);
        assert!(start >= 1000);
        let (start, end) = parse_range("-0", 1000);
        assert!(start > end || start >= 1000);
    }
}
