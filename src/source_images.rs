//! Source image discovery.
//!
//! Lists the top level of the source directory and keeps regular files
//! whose name matches one of the configured image globs (case-insensitive).
//! The model identifier is the file stem: `10A.JPG` → `10A`.

use anyhow::{bail, Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::IngestConfig;

/// An image selected for ingestion.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub path: PathBuf,
    pub file_name: String,
    pub model_id: String,
}

/// Result of scanning the source directory.
#[derive(Debug, Default)]
pub struct SourceScan {
    pub images: Vec<SourceImage>,
    /// Directory entries looked at (files and anything else).
    pub scanned: usize,
    /// Files ignored: wrong extension, unreadable, or no usable stem.
    pub skipped: usize,
}

/// Scan `config.source_dir`. Failing to read the directory itself is fatal;
/// problems with single entries are logged and skipped.
pub fn scan_source_dir(config: &IngestConfig) -> Result<SourceScan> {
    let root = &config.source_dir;
    if !root.is_dir() {
        bail!("Source image directory does not exist: {}", root.display());
    }

    let image_set = build_globset(&config.image_globs)?;
    let mut scan = SourceScan::default();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(config.follow_symlinks)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(e).with_context(|| {
                    format!("Failed to read source image directory: {}", root.display())
                });
            }
            Err(e) => {
                scan.scanned += 1;
                scan.skipped += 1;
                tracing::warn!(error = %e, "cannot access source entry, skipping");
                continue;
            }
        };
        scan.scanned += 1;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            scan.skipped += 1;
            tracing::warn!(
                file = %entry.path().display(),
                "file name is not valid UTF-8, skipping"
            );
            continue;
        };
        match image_from_path(entry.path(), &file_name, &image_set) {
            Some(image) => scan.images.push(image),
            None => {
                scan.skipped += 1;
                tracing::warn!(file = %file_name, "not an image with an accepted extension, skipping");
            }
        }
    }

    Ok(scan)
}

fn image_from_path(path: &Path, file_name: &str, image_set: &GlobSet) -> Option<SourceImage> {
    if !image_set.is_match(file_name) {
        return None;
    }
    path.extension()?;
    let model_id = path.file_stem()?.to_str()?.to_string();
    if model_id.is_empty() {
        return None;
    }
    Some(SourceImage {
        path: path.to_path_buf(),
        file_name: file_name.to_string(),
        model_id,
    })
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .with_context(|| format!("Invalid image glob: {}", pattern))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
