//! Static fallback for paths no legacy rule claims.

use std::path::{Path, PathBuf};

use crate::index::INDEX_FILE;

/// Resolve a decoded URL path to a file under `root`.
///
/// Serves the file itself, or a directory's `index.html`. Anything that
/// escapes the root after symlink resolution is rejected.
pub fn resolve_static(path: &str, root: &Path) -> Option<PathBuf> {
    let clean = path.trim_matches('/');

    // The cascade hands over normalized paths, so a literal `..` segment
    // cannot occur; keep the guard for any other caller
    if clean.split('/').any(|s| s == "..") {
        return None;
    }

    let local = root.join(clean);

    // Canonicalize to resolve symlinks and verify the path stays under root
    let canonical = local.canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join(INDEX_FILE);
        if index.is_file() {
            return Some(index);
        }
    }

    None
}
