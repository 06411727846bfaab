//! JSON-file [`CatalogBackend`].
//!
//! The whole catalog lives in one pretty-printed JSON array. Reads degrade
//! to an empty catalog when the file is missing, blank or corrupt; writes
//! overwrite the file in full.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

use maillots_core::models::{decode_catalog, encode_catalog, CatalogEntry};
use maillots_core::store::CatalogBackend;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogBackend for JsonFileStore {
    async fn load(&self) -> Result<Vec<CatalogEntry>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "catalog file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read catalog file: {}", self.path.display())
                })
            }
        };

        match decode_catalog(&text) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "catalog file is not a valid entry array, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn persist(&self, entries: &[CatalogEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create catalog directory: {}", parent.display())
                })?;
            }
        }
        let text = encode_catalog(entries)?;
        tokio::fs::write(&self.path, text)
            .await
            .with_context(|| format!("Failed to write catalog file: {}", self.path.display()))?;
        Ok(())
    }
}
