//! Legacy URL resolution.
//!
//! The old site exposed many URL shapes for the same content: nested
//! posts, flat posts, category listings, paginated listings, bare
//! language roots, feeds and theme assets. After the export exactly one
//! shape survives on disk, so every request walks an ordered rule
//! cascade that either serves a file, issues a permanent redirect
//! toward the canonical shape, answers 404, or hands the path to plain
//! static serving.
//!
//! The cascade order is the contract. Broad shapes sit below narrow
//! ones so that a historical URL is recognized before a generic rule
//! swallows it; see `rules::CASCADE`.

mod rules;


use std::path::{Path, PathBuf};

use crate::config::ServerConfig;
use crate::core::RequestPath;
use crate::index::{INDEX_FILE, SlugIndex, SlugRecord};

// ============================================================================
// Resolution
// ============================================================================

/// What a request path resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Serve this file with a 200.
    Serve(PathBuf),
    /// 301 to this decoded absolute path. The query string is appended
    /// unchanged by the response layer.
    Redirect(String),
    /// A rule claimed the URL shape but found nothing behind it.
    NotFound,
    /// No rule claimed the URL; fall through to plain static serving.
    Delegate,
}

// ============================================================================
// SiteLayout
// ============================================================================

/// Filesystem and URL-space geometry derived from the config.
///
/// The content root's directory name doubles as the listing URL prefix:
/// a tree exported to `<workspace>/blog` is served under `/blog/...`.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    workspace: PathBuf,
    content_root: PathBuf,
    listing_name: String,
    listing_url: String,
    languages: Vec<String>,
    default_language: String,
    static_pages: Vec<String>,
    asset_prefixes: Vec<String>,
    section_prefixes: Vec<String>,
    mirror_hosts: Vec<String>,
}

impl SiteLayout {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            workspace: config.get_root().to_path_buf(),
            content_root: config.content_root(),
            listing_name: config.content.root.clone(),
            listing_url: format!("/{}", config.content.root),
            languages: config.content.languages.clone(),
            default_language: config.content.default_language.clone(),
            static_pages: config.content.static_pages.clone(),
            asset_prefixes: config.content.asset_prefixes.clone(),
            section_prefixes: config.content.section_prefixes.clone(),
            mirror_hosts: config.content.mirror_hosts.clone(),
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// First URL segment of the listing, e.g. `blog`.
    pub fn listing_name(&self) -> &str {
        &self.listing_name
    }

    /// URL of the listing root, e.g. `/blog`.
    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    /// Join segments under the listing URL.
    pub fn listing_join(&self, segments: &[&str]) -> String {
        format!("{}/{}", self.listing_url, segments.join("/"))
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn is_language(&self, segment: &str) -> bool {
        self.languages.iter().any(|l| l == segment)
    }

    pub fn is_static_page(&self, segment: &str) -> bool {
        self.static_pages.iter().any(|p| p == segment)
    }

    pub fn is_asset_prefix(&self, segment: &str) -> bool {
        self.asset_prefixes.iter().any(|p| p == segment)
    }

    pub fn is_section_prefix(&self, segment: &str) -> bool {
        self.section_prefixes.iter().any(|p| p == segment)
    }

    pub fn is_mirror_host(&self, segment: &str) -> bool {
        self.mirror_hosts.iter().any(|h| h == segment)
    }

    /// Absolute path of `segments` under the content root.
    pub fn content_path(&self, segments: &[&str]) -> PathBuf {
        segments
            .iter()
            .fold(self.content_root.clone(), |path, s| path.join(s))
    }

    /// `index.html` below `segments` under the content root.
    pub fn content_index(&self, segments: &[&str]) -> PathBuf {
        self.content_path(segments).join(INDEX_FILE)
    }
}

// ============================================================================
// Route
// ============================================================================

/// One request path, pre-split for rule matching.
pub(crate) struct Route<'a> {
    segments: Vec<&'a str>,
    trailing_slash: bool,
}

impl<'a> Route<'a> {
    fn new(path: &'a RequestPath) -> Self {
        Self {
            segments: path.segments(),
            trailing_slash: path.has_trailing_slash(),
        }
    }

    pub(crate) fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    pub(crate) fn trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Segments after the listing prefix, when the path is under it.
    pub(crate) fn under(&self, listing: &str) -> Option<&[&'a str]> {
        match self.segments.split_first() {
            Some((first, rest)) if *first == listing => Some(rest),
            _ => None,
        }
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Applies the rule cascade to request paths.
///
/// Resolution is pure computation plus bounded `stat` calls; the slug
/// index is read-only for the server's lifetime, so a resolver can be
/// shared across request threads freely.
pub struct Resolver {
    layout: SiteLayout,
    index: SlugIndex,
}

impl Resolver {
    pub fn new(layout: SiteLayout, index: SlugIndex) -> Self {
        Self { layout, index }
    }

    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    pub fn index(&self) -> &SlugIndex {
        &self.index
    }

    /// Resolve a request path to its outcome.
    pub fn resolve(&self, path: &RequestPath) -> Resolution {
        self.resolve_traced(path).1
    }

    /// Resolve and also report which rule decided, for diagnostics.
    pub fn resolve_traced(&self, path: &RequestPath) -> (&'static str, Resolution) {
        let route = Route::new(path);
        for (name, rule) in rules::CASCADE {
            if let Some(resolution) = rule(self, &route) {
                return (name, resolution);
            }
        }
        ("delegate", Resolution::Delegate)
    }

    /// Slug lookup that also confirms the indexed page still exists.
    fn slug_on_disk(&self, slug: &str) -> Option<&SlugRecord> {
        self.index.get(slug).filter(|r| r.index_file.is_file())
    }

    /// 301 to the record's canonical URL.
    fn canonical_redirect(&self, record: &SlugRecord) -> Resolution {
        Resolution::Redirect(record.canonical_url(self.layout.listing_url()))
    }
}
