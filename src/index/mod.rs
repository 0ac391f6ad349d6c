//! Slug index built from the exported content tree.
//!
//! Every directory below the content root that carries an `index.html`
//! is a page. The directory name is the page's slug, and its position
//! in the tree records the language and category the old site filed it
//! under:
//!
//! ```text
//! blog/faq/index.html                   slug "faq"         no language
//! blog/us/tips/index.html               slug "tips"        no language
//! blog/us/tips/moving-day/index.html    slug "moving-day"  us / tips
//! ```
//!
//! Slugs were globally unique on the old site, so the index is flat.
//! When an export still manages to collide, the first record in scan
//! order wins and the loser is reported.

mod walk;

pub use walk::{ContentUnit, INDEX_FILE, collect_units};

use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use crate::log;

// ============================================================================
// SlugRecord
// ============================================================================

/// Where one slug lives on disk and in the URL space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugRecord {
    pub slug: String,
    /// Absolute path of the exported page.
    pub index_file: PathBuf,
    /// Language directory, only for pages at least three levels deep.
    pub language: Option<String>,
    /// Category directory, set together with `language`.
    pub category: Option<String>,
}

impl SlugRecord {
    fn from_unit(unit: ContentUnit) -> Self {
        // Three levels or deeper means language/category/.../slug.
        // Shallower pages (top-level pages, category listings) have
        // neither.
        let (language, category) = match unit.segments.as_slice() {
            [language, category, _, ..] => (Some(language.clone()), Some(category.clone())),
            _ => (None, None),
        };
        let slug = unit.segments.last().cloned().unwrap_or_default();

        Self {
            slug,
            index_file: unit.index_file,
            language,
            category,
        }
    }

    /// Canonical URL for this record under the given listing prefix.
    ///
    /// Posts filed under a language and category canonicalize to the
    /// nested form; everything else lives directly under the listing.
    pub fn canonical_url(&self, listing: &str) -> String {
        match (&self.language, &self.category) {
            (Some(language), Some(category)) => {
                format!("{listing}/{language}/{category}/{}", self.slug)
            }
            _ => format!("{listing}/{}", self.slug),
        }
    }
}

// ============================================================================
// SlugIndex
// ============================================================================

/// A slug claimed by more than one page directory.
#[derive(Debug, Clone)]
pub struct SlugCollision {
    pub slug: String,
    pub kept: PathBuf,
    pub discarded: PathBuf,
}

/// Flat slug -> record map for the whole content tree.
#[derive(Debug, Default)]
pub struct SlugIndex {
    records: FxHashMap<String, SlugRecord>,
}

impl SlugIndex {
    /// Fold scanned units into an index. The first record per slug wins;
    /// later claims are returned as collisions.
    pub fn from_units(units: Vec<ContentUnit>) -> (Self, Vec<SlugCollision>) {
        let mut records = FxHashMap::default();
        let mut collisions = Vec::new();

        for unit in units {
            let record = SlugRecord::from_unit(unit);
            match records.entry(record.slug.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(record);
                }
                Entry::Occupied(entry) => collisions.push(SlugCollision {
                    slug: record.slug,
                    kept: entry.get().index_file.clone(),
                    discarded: record.index_file,
                }),
            }
        }

        (Self { records }, collisions)
    }

    /// Scan the content tree and build the index, logging what was found.
    pub fn scan(content_root: &Path) -> Self {
        let (index, collisions) = Self::from_units(collect_units(content_root));

        for collision in &collisions {
            log!(
                "warning";
                "duplicate slug '{}': keeping {}, ignoring {}",
                collision.slug,
                collision.kept.display(),
                collision.discarded.display()
            );
        }
        log!(
            "scan";
            "indexed {} slugs under {}",
            index.len(),
            content_root.display()
        );

        index
    }

    pub fn get(&self, slug: &str) -> Option<&SlugRecord> {
        self.records.get(slug)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted by slug, for stable listings.
    pub fn sorted_records(&self) -> Vec<&SlugRecord> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by(|a, b| a.slug.cmp(&b.slug));
        records
    }
}

// ============================================================================
// tests
// ============================================================================
