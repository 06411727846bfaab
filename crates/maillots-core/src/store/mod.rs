//! Catalog persistence and merge rules.
//!
//! [`CatalogBackend`] is the load/persist seam: the JSON file in
//! production, [`memory::InMemoryBackend`] in tests. [`CatalogStore`] holds
//! one loaded copy of the collection and applies the merge rules shared by
//! the ingestor and the tag-update path.
//!
//! Every mutation sequence is load → mutate → a single [`CatalogStore::persist`].
//! There is no locking; the last writer to persist wins.

pub mod memory;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::CatalogEntry;
use crate::natural::sort_natural;

/// Abstract storage for the whole entry collection.
///
/// `load` must return an empty collection when the data is absent, blank
/// or unparseable, and reserve errors for real I/O failures.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn load(&self) -> Result<Vec<CatalogEntry>>;

    /// Overwrite the stored collection with `entries`, in the given order.
    async fn persist(&self, entries: &[CatalogEntry]) -> Result<()>;
}

#[async_trait]
impl<B: CatalogBackend + ?Sized> CatalogBackend for Arc<B> {
    async fn load(&self) -> Result<Vec<CatalogEntry>> {
        (**self).load().await
    }

    async fn persist(&self, entries: &[CatalogEntry]) -> Result<()> {
        (**self).persist(entries).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("model \"{0}\" not found")]
    NotFound(String),
}

/// What [`CatalogStore::upsert_from_image`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    PathUpdated,
    Unchanged,
}

/// Ordering applied by [`CatalogStore::persist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOrder {
    /// Natural model order, as written by the ingestor.
    Natural,
    /// Keep the current order, as written by tag updates.
    AsIs,
}

/// An in-memory working copy of the catalog bound to a backend.
pub struct CatalogStore<B: CatalogBackend> {
    backend: B,
    entries: Vec<CatalogEntry>,
    /// model id → position of its first occurrence in `entries`.
    index: HashMap<String, usize>,
    dirty: bool,
}

impl<B: CatalogBackend> CatalogStore<B> {
    /// Create a store and load the current collection.
    pub async fn open(backend: B) -> Result<Self> {
        let mut store = Self {
            backend,
            entries: Vec::new(),
            index: HashMap::new(),
            dirty: false,
        };
        store.load().await?;
        Ok(store)
    }

    /// Replace the working copy with the backend's current content.
    pub async fn load(&mut self) -> Result<&[CatalogEntry]> {
        self.entries = self.backend.load().await?;
        self.reindex();
        self.dirty = false;
        Ok(&self.entries)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (pos, entry) in self.entries.iter().enumerate() {
            self.index.entry(entry.model_id.clone()).or_insert(pos);
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, model_id: &str) -> Option<&CatalogEntry> {
        self.index.get(model_id).map(|&pos| &self.entries[pos])
    }

    /// True when the working copy differs from what was last loaded or persisted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Insert a new untagged entry, or refresh the image path of a known one.
    pub fn upsert_from_image(&mut self, model_id: &str, image_path: &str) -> UpsertOutcome {
        match self.index.get(model_id) {
            Some(&pos) => {
                let entry = &mut self.entries[pos];
                if entry.image_path == image_path {
                    UpsertOutcome::Unchanged
                } else {
                    entry.image_path = image_path.to_string();
                    self.dirty = true;
                    UpsertOutcome::PathUpdated
                }
            }
            None => {
                self.index.insert(model_id.to_string(), self.entries.len());
                self.entries.push(CatalogEntry::new(model_id, image_path));
                self.dirty = true;
                UpsertOutcome::Inserted
            }
        }
    }

    /// Replace an entry's tags wholesale. Tags are stored verbatim.
    pub fn replace_tags(
        &mut self,
        model_id: &str,
        tags: Vec<String>,
    ) -> Result<&CatalogEntry, StoreError> {
        let pos = *self
            .index
            .get(model_id)
            .ok_or_else(|| StoreError::NotFound(model_id.to_string()))?;
        let entry = &mut self.entries[pos];
        entry.tags = tags;
        self.dirty = true;
        Ok(entry)
    }

    /// Write the full collection to the backend, overwriting it.
    pub async fn persist(&mut self, order: PersistOrder) -> Result<()> {
        if order == PersistOrder::Natural {
            sort_natural(&mut self.entries);
            self.reindex();
        }
        self.backend.persist(&self.entries).await?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::memory::InMemoryBackend;
    use super::*;

    fn seeded() -> InMemoryBackend {
        let mut tagged = CatalogEntry::new("10A", "/images/10A.jpg");
        tagged.tags = vec!["ROJO".to_string()];
        InMemoryBackend::with_entries(vec![tagged, CatalogEntry::new("2A", "/images/2A.jpg")])
    }

    #[tokio::test]
    async fn test_upsert_inserts_unknown_model() {
        let mut store = CatalogStore::open(InMemoryBackend::new()).await.unwrap();
        let outcome = store.upsert_from_image("5C", "/images/5C.png");
        assert_eq!(outcome, UpsertOutcome::Inserted);
        let entry = store.get("5C").unwrap();
        assert_eq!(entry.image_path, "/images/5C.png");
        assert!(entry.tags.is_empty());
        assert!(store.is_dirty());
    }

    #[tokio::test]
    async fn test_upsert_same_path_is_noop() {
        let mut store = CatalogStore::open(seeded()).await.unwrap();
        assert_eq!(
            store.upsert_from_image("2A", "/images/2A.jpg"),
            UpsertOutcome::Unchanged
        );
        assert_eq!(
            store.upsert_from_image("2A", "/images/2A.jpg"),
            UpsertOutcome::Unchanged
        );
        assert!(!store.is_dirty());
    }

    #[tokio::test]
    async fn test_upsert_twice_second_call_unchanged() {
        let mut store = CatalogStore::open(InMemoryBackend::new()).await.unwrap();
        assert_eq!(store.upsert_from_image("1A", "/images/1A.jpg"), UpsertOutcome::Inserted);
        let snapshot = store.entries().to_vec();
        assert_eq!(store.upsert_from_image("1A", "/images/1A.jpg"), UpsertOutcome::Unchanged);
        assert_eq!(store.entries(), snapshot.as_slice());
    }

    #[tokio::test]
    async fn test_upsert_changed_path_keeps_tags() {
        let mut store = CatalogStore::open(seeded()).await.unwrap();
        let outcome = store.upsert_from_image("10A", "/images/10A.webp");
        assert_eq!(outcome, UpsertOutcome::PathUpdated);
        let entry = store.get("10A").unwrap();
        assert_eq!(entry.image_path, "/images/10A.webp");
        assert_eq!(entry.tags, vec!["ROJO".to_string()]);
    }

    #[tokio::test]
    async fn test_replace_tags_unknown_model() {
        let backend = Arc::new(seeded());
        let mut store = CatalogStore::open(backend.clone()).await.unwrap();
        let before = store.entries().to_vec();
        let err = store.replace_tags("99Z", vec!["AZUL".to_string()]).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref id) if id == "99Z"));
        assert_eq!(store.entries(), before.as_slice());
        assert!(!store.is_dirty());
    }

    #[tokio::test]
    async fn test_replace_tags_is_verbatim() {
        let mut store = CatalogStore::open(seeded()).await.unwrap();
        let tags = vec!["rojo ".to_string(), "rojo ".to_string()];
        let entry = store.replace_tags("2A", tags.clone()).unwrap();
        assert_eq!(entry.tags, tags);
    }

    #[tokio::test]
    async fn test_persist_natural_sorts() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut store = CatalogStore::open(backend.clone()).await.unwrap();
        store.upsert_from_image("10A", "/images/10A.png");
        store.upsert_from_image("2A", "/images/2A.jpg");
        store.persist(PersistOrder::Natural).await.unwrap();

        let ids: Vec<String> = backend.snapshot().into_iter().map(|e| e.model_id).collect();
        assert_eq!(ids, vec!["2A", "10A"]);
        assert_eq!(store.get("10A").unwrap().image_path, "/images/10A.png");
        assert_eq!(backend.persist_count(), 1);
    }

    #[tokio::test]
    async fn test_persist_as_is_keeps_order() {
        let backend = Arc::new(seeded());
        let mut store = CatalogStore::open(backend.clone()).await.unwrap();
        store.replace_tags("2A", vec!["AZUL".to_string()]).unwrap();
        store.persist(PersistOrder::AsIs).await.unwrap();

        let ids: Vec<String> = backend.snapshot().into_iter().map(|e| e.model_id).collect();
        assert_eq!(ids, vec!["10A", "2A"]);
    }

    #[tokio::test]
    async fn test_persist_then_load_round_trip() {
        let backend = Arc::new(seeded());
        let mut store = CatalogStore::open(backend.clone()).await.unwrap();
        store.upsert_from_image("3B", "/images/3B.gif");
        store.persist(PersistOrder::Natural).await.unwrap();
        let written = store.entries().to_vec();

        let reloaded = CatalogStore::open(backend).await.unwrap();
        assert_eq!(reloaded.entries(), written.as_slice());
    }

    #[tokio::test]
    async fn test_duplicate_ids_resolve_to_first() {
        let backend = InMemoryBackend::with_entries(vec![
            CatalogEntry::new("1A", "/images/first.jpg"),
            CatalogEntry::new("1A", "/images/second.jpg"),
        ]);
        let store = CatalogStore::open(backend).await.unwrap();
        assert_eq!(store.get("1A").unwrap().image_path, "/images/first.jpg");
        assert_eq!(store.len(), 2);
    }
}
