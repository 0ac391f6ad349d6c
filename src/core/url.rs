//! Request path type for type-safe route matching.
//!
//! - Internal representation: Always decoded (human-readable)
//! - Browser boundary: Decode on input, encode redirect Locations on output

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters that must stay escaped inside an emitted path segment.
///
/// Deliberately narrow: ordinary slug characters (`-`, `_`, `.`, `~`) pass
/// through unchanged, so ASCII Locations are byte-identical to the decoded
/// path.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'%')
    .add(b'{')
    .add(b'}');

/// Decoded, normalized request path plus its raw query string.
///
/// Invariants:
/// - `path` is percent-decoded, starts with `/`, and contains no empty,
///   `.` or `..` segments
/// - a trailing slash is preserved (except on `/` itself); several legacy
///   routes treat `/x` and `/x/` differently
/// - `query` is the raw query string without the leading `?`, empty when
///   the request had none; it is never decoded or inspected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath {
    path: String,
    query: String,
}

impl RequestPath {
    /// Parse a raw request target (origin-form, possibly percent-encoded).
    pub fn parse(raw: &str) -> Self {
        let (target, query) = match raw.find('?') {
            Some(idx) => (&raw[..idx], &raw[idx + 1..]),
            None => (raw, ""),
        };
        // Fragments normally never reach the server; strip them anyway
        let target = target.split('#').next().unwrap_or(target);
        let decoded = percent_decode_str(target)
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| target.to_string());

        Self {
            path: normalize(&decoded),
            query: query.to_string(),
        }
    }

    /// Get the decoded, normalized path as a string slice.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the raw query string (without `?`), empty when absent.
    #[inline]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Split the path into its non-empty segments.
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Check whether the path carries a trailing slash (`/` itself does not).
    #[inline]
    pub fn has_trailing_slash(&self) -> bool {
        self.path.len() > 1 && self.path.ends_with('/')
    }
}

impl std::fmt::Display for RequestPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Collapse duplicate slashes, drop `.`, resolve `..` (capped at the root)
/// and keep a single trailing slash when the input had one.
fn normalize(decoded: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut path = String::with_capacity(decoded.len());
    for segment in &segments {
        path.push('/');
        path.push_str(segment);
    }
    if decoded.ends_with('/') {
        path.push('/');
    }
    path
}

/// Encode a decoded path for the browser (percent-encode per segment).
pub fn encode_path(decoded: &str) -> String {
    decoded
        .split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let path = RequestPath::parse("/blog/moving-day");
        assert_eq!(path.path(), "/blog/moving-day");
        assert_eq!(path.query(), "");
        assert!(!path.has_trailing_slash());
    }

    #[test]
    fn test_parse_keeps_trailing_slash() {
        let path = RequestPath::parse("/blog/moving-day/");
        assert_eq!(path.path(), "/blog/moving-day/");
        assert!(path.has_trailing_slash());
    }

    #[test]
    fn test_root_has_no_trailing_slash() {
        let path = RequestPath::parse("/");
        assert_eq!(path.path(), "/");
        assert!(!path.has_trailing_slash());
    }

    #[test]
    fn test_parse_query_kept_verbatim() {
        let path = RequestPath::parse("/blog/post?utm_source=mail&x=%20");
        assert_eq!(path.path(), "/blog/post");
        assert_eq!(path.query(), "utm_source=mail&x=%20");
    }

    #[test]
    fn test_parse_empty_query() {
        let path = RequestPath::parse("/blog/post?");
        assert_eq!(path.path(), "/blog/post");
        assert_eq!(path.query(), "");
    }

    #[test]
    fn test_parse_strips_fragment() {
        let path = RequestPath::parse("/blog/post#section");
        assert_eq!(path.path(), "/blog/post");
    }

    #[test]
    fn test_parse_percent_decoding() {
        let path = RequestPath::parse("/blog/hello%20world");
        assert_eq!(path.path(), "/blog/hello world");
    }

    #[test]
    fn test_parse_invalid_utf8_preserved() {
        let path = RequestPath::parse("/blog/%FF");
        assert_eq!(path.path(), "/blog/%FF");
    }

    #[test]
    fn test_normalize_duplicate_slashes() {
        let path = RequestPath::parse("/blog//us///tips");
        assert_eq!(path.path(), "/blog/us/tips");
    }

    #[test]
    fn test_normalize_dot_segments() {
        let path = RequestPath::parse("/blog/./us/tips/../guides");
        assert_eq!(path.path(), "/blog/us/guides");
    }

    #[test]
    fn test_normalize_dotdot_capped_at_root() {
        let path = RequestPath::parse("/../../etc/passwd");
        assert_eq!(path.path(), "/etc/passwd");
    }

    #[test]
    fn test_normalize_to_root() {
        assert_eq!(RequestPath::parse("/a/..").path(), "/");
        assert_eq!(RequestPath::parse("//").path(), "/");
        assert_eq!(RequestPath::parse("").path(), "/");
    }

    #[test]
    fn test_normalize_keeps_trailing_after_dotdot() {
        let path = RequestPath::parse("/blog/us/../");
        assert_eq!(path.path(), "/blog/");
        assert!(path.has_trailing_slash());
    }

    #[test]
    fn test_segments() {
        let path = RequestPath::parse("/blog/us/tips/");
        assert_eq!(path.segments(), vec!["blog", "us", "tips"]);
        assert!(RequestPath::parse("/").segments().is_empty());
    }

    #[test]
    fn test_encode_path_ascii_identity() {
        assert_eq!(encode_path("/blog/moving-day"), "/blog/moving-day");
        assert_eq!(encode_path("/blog/us/tips/a_b.c~d"), "/blog/us/tips/a_b.c~d");
    }

    #[test]
    fn test_encode_path_space() {
        assert_eq!(encode_path("/blog/hello world"), "/blog/hello%20world");
    }

    #[test]
    fn test_encode_path_unicode() {
        assert_eq!(encode_path("/blog/中文"), "/blog/%E4%B8%AD%E6%96%87");
    }

    #[test]
    fn test_encode_path_percent() {
        assert_eq!(encode_path("/blog/50%off"), "/blog/50%25off");
    }

    #[test]
    fn test_decode_then_encode_round_trip() {
        let path = RequestPath::parse("/blog/%E4%B8%AD%E6%96%87");
        assert_eq!(path.path(), "/blog/中文");
        assert_eq!(encode_path(path.path()), "/blog/%E4%B8%AD%E6%96%87");
    }
}
