//! Scan command implementation.
//!
//! Walks the content tree the same way server startup does and prints
//! the resulting slug index, either as a readable table or as JSON.

use anyhow::{Result, bail};
use serde::Serialize;

use crate::config::ServerConfig;
use crate::index::{SlugCollision, SlugIndex, collect_units};
use crate::log;
use crate::resolve::SiteLayout;

/// One slug in the report.
#[derive(Debug, Serialize)]
pub struct RecordReport {
    pub slug: String,
    pub canonical: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub file: String,
}

/// One discarded duplicate in the report.
#[derive(Debug, Serialize)]
pub struct CollisionReport {
    pub slug: String,
    pub kept: String,
    pub discarded: String,
}

/// Full scan output.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub slugs: Vec<RecordReport>,
    pub collisions: Vec<CollisionReport>,
}

/// Execute scan command
pub fn run_scan(config: &ServerConfig, json: bool) -> Result<()> {
    let layout = SiteLayout::new(config);
    if !layout.content_root().is_dir() {
        bail!(
            "content root {} not found (expected under {})",
            layout.content_root().display(),
            layout.workspace().display()
        );
    }

    let (index, collisions) = SlugIndex::from_units(collect_units(layout.content_root()));
    let report = build_report(config, &layout, &index, &collisions);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for record in &report.slugs {
        println!("{:<40} {}", record.slug, record.canonical);
    }
    for collision in &report.collisions {
        log!(
            "warning";
            "duplicate slug '{}': keeping {}, ignoring {}",
            collision.slug,
            collision.kept,
            collision.discarded
        );
    }
    log!(
        "scan";
        "indexed {} slugs under {}",
        report.slugs.len(),
        layout.content_root().display()
    );

    Ok(())
}

fn build_report(
    config: &ServerConfig,
    layout: &SiteLayout,
    index: &SlugIndex,
    collisions: &[SlugCollision],
) -> ScanReport {
    let slugs = index
        .sorted_records()
        .iter()
        .map(|record| RecordReport {
            slug: record.slug.clone(),
            canonical: record.canonical_url(layout.listing_url()),
            language: record.language.clone(),
            category: record.category.clone(),
            file: config.root_relative(&record.index_file).display().to_string(),
        })
        .collect();

    let collisions = collisions
        .iter()
        .map(|collision| CollisionReport {
            slug: collision.slug.clone(),
            kept: config.root_relative(&collision.kept).display().to_string(),
            discarded: config
                .root_relative(&collision.discarded)
                .display()
                .to_string(),
        })
        .collect();

    ScanReport { slugs, collisions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_report_shape() {
        let dir = TempDir::new().unwrap();
        let post = dir.path().join("blog/us/tips/moving-day");
        fs::create_dir_all(&post).unwrap();
        fs::write(post.join("index.html"), "<html></html>").unwrap();

        let mut config = ServerConfig::default();
        config.root = dir.path().to_path_buf();
        let layout = SiteLayout::new(&config);
        let (index, collisions) = SlugIndex::from_units(collect_units(layout.content_root()));

        let report = build_report(&config, &layout, &index, &collisions);
        assert_eq!(report.slugs.len(), 1);
        assert!(report.collisions.is_empty());

        let record = &report.slugs[0];
        assert_eq!(record.slug, "moving-day");
        assert_eq!(record.canonical, "/blog/us/tips/moving-day");
        assert_eq!(record.file, "blog/us/tips/moving-day/index.html");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["slugs"][0]["language"], "us");
        assert_eq!(json["slugs"][0]["category"], "tips");
    }
}
