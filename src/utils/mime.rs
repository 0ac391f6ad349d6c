//! Content-Type guessing for the exported tree.
//!
//! The table covers what a WordPress export actually ships: pages,
//! theme assets, uploads, feeds and fonts. Anything unrecognized is
//! served as an opaque download.

use std::path::Path;

/// MIME constants referenced outside the extension table.
pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Guess the Content-Type for a file path from its extension.
pub fn from_path(path: &Path) -> &'static str {
    from_extension(path.extension().and_then(|e| e.to_str()))
}

/// Guess the Content-Type from a bare extension.
pub fn from_extension(ext: Option<&str>) -> &'static str {
    match ext {
        // Pages and theme files
        Some("html" | "htm") => types::HTML,
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => types::PLAIN,

        // Feed exports
        Some("xml") => "application/xml",
        Some("rss") => "application/rss+xml",
        Some("atom") => "application/atom+xml",

        // Uploads: images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",

        // Uploads: media
        Some("mp3") => "audio/mpeg",
        Some("ogg" | "oga") => "audio/ogg",
        Some("wav") => "audio/wav",
        Some("mp4" | "m4v") => "video/mp4",
        Some("webm") => "video/webm",

        // Theme fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents and archives
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",

        _ => types::OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_path() {
        assert_eq!(from_path(&PathBuf::from("index.html")), types::HTML);
        assert_eq!(from_path(&PathBuf::from("style.css")), "text/css; charset=utf-8");
        assert_eq!(
            from_path(&PathBuf::from("wp-content/uploads/photo.jpeg")),
            "image/jpeg"
        );
        assert_eq!(from_path(&PathBuf::from("favicon.ico")), "image/x-icon");
        assert_eq!(from_path(&PathBuf::from("feed/index.rss")), "application/rss+xml");
        assert_eq!(from_path(&PathBuf::from("clip.mp4")), "video/mp4");
        assert_eq!(from_path(&PathBuf::from("menu.pdf")), "application/pdf");
        assert_eq!(from_path(&PathBuf::from("unknown.xyz")), types::OCTET_STREAM);
    }

    #[test]
    fn test_from_extension_without_extension() {
        assert_eq!(from_extension(None), types::OCTET_STREAM);
        assert_eq!(from_path(&PathBuf::from("LICENSE")), types::OCTET_STREAM);
    }
}
