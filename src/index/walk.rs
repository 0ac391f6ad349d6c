//! Content tree traversal.

use jwalk::WalkDir;
use std::path::{Path, PathBuf};

/// File name every exported page directory carries.
pub const INDEX_FILE: &str = "index.html";

/// One page directory under the content root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUnit {
    /// Absolute path of the directory's exported page.
    pub index_file: PathBuf,
    /// Directory path relative to the content root, split into segments.
    pub segments: Vec<String>,
}

/// Collect all page directories under `root` recursively.
///
/// A directory counts as a page when it carries an `index.html`. The
/// content root itself is skipped, it is the listing, not a post.
pub fn collect_units(root: &Path) -> Vec<ContentUnit> {
    let mut units: Vec<ContentUnit> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| unit_for_dir(root, &e.path()))
        .collect();

    // Walk order varies by platform; sort so duplicate handling is stable.
    units.sort_by(|a, b| a.segments.cmp(&b.segments));
    units
}

fn unit_for_dir(root: &Path, dir: &Path) -> Option<ContentUnit> {
    let index_file = dir.join(INDEX_FILE);
    if !index_file.is_file() {
        return None;
    }

    let rel = dir.strip_prefix(root).ok()?;
    let segments: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_str().map(str::to_string))
        .collect::<Option<_>>()?;

    if segments.is_empty() {
        return None;
    }

    Some(ContentUnit {
        index_file,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_page(root: &Path, rel: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(INDEX_FILE), "<html></html>").unwrap();
    }

    #[test]
    fn test_collect_units_skips_root_and_bare_dirs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join(INDEX_FILE), "<html></html>").unwrap();
        write_page(root, "faq");
        // No index.html, not a page
        fs::create_dir_all(root.join("wp-content/uploads")).unwrap();

        let units = collect_units(root);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].segments, ["faq"]);
        assert_eq!(units[0].index_file, root.join("faq").join(INDEX_FILE));
    }

    #[test]
    fn test_collect_units_all_depths_sorted() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_page(root, "us");
        write_page(root, "us/tips");
        write_page(root, "us/tips/moving-day");
        write_page(root, "mexico/consejos/mudanza");

        let segments: Vec<_> = collect_units(root)
            .into_iter()
            .map(|u| u.segments.join("/"))
            .collect();
        assert_eq!(
            segments,
            [
                "mexico/consejos/mudanza",
                "us",
                "us/tips",
                "us/tips/moving-day"
            ]
        );
    }

    #[test]
    fn test_collect_units_missing_root() {
        let dir = TempDir::new().unwrap();
        let units = collect_units(&dir.path().join("gone"));
        assert!(units.is_empty());
    }
}
