//! Image ingestion.
//!
//! Reconciles the source image directory with the catalog: every accepted
//! image is copied to the public image directory and merged into the
//! catalog by model identifier. The catalog is then written back in natural
//! order, whether or not anything changed.
//!
//! Failure handling:
//! - unreadable source directory: the run aborts before anything is written;
//! - a failed copy: that file is skipped, the rest continue;
//! - a failed catalog write: reported, already copied images stay in place.

use anyhow::{Context, Result};
use std::path::Path;

use maillots_core::store::{CatalogBackend, CatalogStore, PersistOrder, UpsertOutcome};

use crate::config::{Config, IngestConfig};
use crate::json_store::JsonFileStore;
use crate::source_images::scan_source_dir;

/// Counters for one ingest run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub scanned: usize,
    /// Images copied, or that would be copied in a dry run.
    pub copied: usize,
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total_entries: usize,
}

impl IngestReport {
    pub fn changed(&self) -> bool {
        self.copied > 0 || self.inserted > 0 || self.updated > 0
    }
}

/// `maillots ingest`: run against the configured catalog file and print a summary.
pub async fn run_ingest(config: &Config, dry_run: bool) -> Result<()> {
    let catalog_path = &config.catalog.path;
    if !dry_run {
        if let Some(parent) = catalog_path.parent() {
            ensure_dir(parent).await?;
        }
    }

    let store = JsonFileStore::new(catalog_path);
    let report = ingest(&config.ingest, store, dry_run).await?;

    if dry_run {
        println!("ingest (dry-run)");
    } else {
        println!("ingest");
    }
    println!("  entries scanned: {}", report.scanned);
    if dry_run {
        println!("  images to copy: {}", report.copied);
    } else {
        println!("  images copied: {}", report.copied);
    }
    println!("  new models: {}", report.inserted);
    println!("  image paths updated: {}", report.updated);
    println!("  unchanged models: {}", report.unchanged);
    println!("  skipped files: {}", report.skipped);
    println!("  failed copies: {}", report.failed);
    println!("  catalog size: {}", report.total_entries);
    if dry_run {
        println!("  nothing written");
    } else if report.changed() {
        println!("  saved {}", catalog_path.display());
    } else {
        println!("  no changes, {} re-sorted", catalog_path.display());
    }
    println!("ok");
    Ok(())
}

/// Merge the source images into the catalog held by `backend`.
///
/// With `dry_run`, nothing is copied or persisted; the report shows what
/// would have happened.
pub async fn ingest<B: CatalogBackend>(
    config: &IngestConfig,
    backend: B,
    dry_run: bool,
) -> Result<IngestReport> {
    if !dry_run {
        ensure_dir(&config.public_images_dir).await?;
        if ensure_dir(&config.source_dir).await? {
            tracing::info!(
                dir = %config.source_dir.display(),
                "created source image directory; add images there to ingest them"
            );
        }
    }

    let mut store = CatalogStore::open(backend).await?;
    let scan = scan_source_dir(config)?;

    let mut report = IngestReport {
        scanned: scan.scanned,
        skipped: scan.skipped,
        ..IngestReport::default()
    };

    if scan.images.is_empty() {
        tracing::info!(dir = %config.source_dir.display(), "no images found");
    }

    for image in &scan.images {
        if !dry_run {
            let target = config.public_images_dir.join(&image.file_name);
            if let Err(e) = tokio::fs::copy(&image.path, &target).await {
                tracing::error!(file = %image.file_name, error = %e, "failed to copy image, skipping");
                report.failed += 1;
                continue;
            }
            tracing::debug!(file = %image.file_name, "image copied");
        }
        report.copied += 1;

        let url = image_url(&config.image_url_prefix, &image.file_name);
        match store.upsert_from_image(&image.model_id, &url) {
            UpsertOutcome::Inserted => {
                tracing::info!(model = %image.model_id, "new model added to catalog");
                report.inserted += 1;
            }
            UpsertOutcome::PathUpdated => {
                tracing::info!(model = %image.model_id, image = %url, "image path updated");
                report.updated += 1;
            }
            UpsertOutcome::Unchanged => report.unchanged += 1,
        }
    }

    report.total_entries = store.len();

    if !dry_run {
        store
            .persist(PersistOrder::Natural)
            .await
            .context("Catalog not saved; copied images were kept")?;
    }

    Ok(report)
}

/// Public URL of an ingested image: `/images` + `2A.jpg` → `/images/2A.jpg`.
pub fn image_url(prefix: &str, file_name: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), file_name)
}

/// Create `dir` if needed. Returns true when it had to be created.
async fn ensure_dir(dir: &Path) -> Result<bool> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(false);
    }
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    tracing::info!(dir = %dir.display(), "directory created");
    Ok(true)
}
