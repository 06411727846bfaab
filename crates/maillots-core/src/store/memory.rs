//! In-memory [`CatalogBackend`] for tests and embedding.
//!
//! Keeps the collection behind a `std::sync::RwLock` and counts loads and
//! persists so callers can assert whether a read-modify-write happened.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::models::CatalogEntry;

use super::CatalogBackend;

#[derive(Default)]
pub struct InMemoryBackend {
    entries: RwLock<Vec<CatalogEntry>>,
    loads: AtomicUsize,
    persists: AtomicUsize,
    fail_persist: AtomicBool,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
            ..Self::default()
        }
    }

    /// Make every subsequent `persist` fail with an I/O-like error.
    pub fn fail_persists(&self, fail: bool) {
        self.fail_persist.store(fail, Ordering::SeqCst);
    }

    /// Copy of the currently stored collection.
    pub fn snapshot(&self) -> Vec<CatalogEntry> {
        self.entries.read().unwrap().clone()
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn persist_count(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogBackend for InMemoryBackend {
    async fn load(&self) -> Result<Vec<CatalogEntry>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.read().unwrap().clone())
    }

    async fn persist(&self, entries: &[CatalogEntry]) -> Result<()> {
        if self.fail_persist.load(Ordering::SeqCst) {
            bail!("in-memory backend is read-only");
        }
        self.persists.fetch_add(1, Ordering::SeqCst);
        *self.entries.write().unwrap() = entries.to_vec();
        Ok(())
    }
}
