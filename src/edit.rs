//! Local tag editing for operators.
//!
//! Works directly on the catalog file (no password): the tag input is
//! formatted like the browser editor does, then the entry's tags are
//! replaced and the catalog persisted without re-sorting.

use anyhow::{bail, Result};

use maillots_core::models::CatalogEntry;
use maillots_core::store::{CatalogBackend, CatalogStore, PersistOrder};
use maillots_core::tags::{parse_tag_input, TagInput};

use crate::config::Config;
use crate::json_store::JsonFileStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagEdit {
    /// Replace all tags with the input.
    Set,
    /// Append the input to the current tags.
    Add,
}

/// Apply a tag edit to `model_id` and persist. Returns the updated entry
/// and the parse outcome for reporting.
pub async fn edit_tags<B: CatalogBackend>(
    backend: B,
    model_id: &str,
    input: &str,
    mode: TagEdit,
) -> Result<(CatalogEntry, TagInput)> {
    let mut store = CatalogStore::open(backend).await?;
    let current = match store.get(model_id) {
        Some(entry) => entry.tags.clone(),
        None => bail!("model \"{}\" not found", model_id),
    };

    let (parsed, tags) = match mode {
        TagEdit::Set => {
            let parsed = parse_tag_input(input, &[]);
            let tags = parsed.added.clone();
            (parsed, tags)
        }
        TagEdit::Add => {
            let parsed = parse_tag_input(input, &current);
            let tags = parsed.merged_with(&current);
            (parsed, tags)
        }
    };

    if mode == TagEdit::Set && parsed.added.is_empty() && !input.trim().is_empty() {
        bail!("no valid tags in \"{}\"", input.trim());
    }

    let updated = store.replace_tags(model_id, tags)?.clone();
    store.persist(PersistOrder::AsIs).await?;
    tracing::info!(model = %model_id, tags = updated.tags.len(), "tags updated");
    Ok((updated, parsed))
}

/// `maillots tags set|add`.
pub async fn run_tags(config: &Config, model_id: &str, input: &str, mode: TagEdit) -> Result<()> {
    let store = JsonFileStore::new(&config.catalog.path);
    let (entry, parsed) = edit_tags(store, model_id, input, mode).await?;

    println!("tags {}", entry.model_id);
    println!("  added: {}", parsed.added.len());
    if parsed.duplicates > 0 {
        println!("  already present: {}", parsed.duplicates);
    }
    if !parsed.invalid.is_empty() {
        println!("  ignored (invalid): \"{}\"", parsed.invalid.join("\", \""));
    }
    if entry.tags.is_empty() {
        println!("  tags: -");
    } else {
        println!("  tags: {}", entry.tags.join(", "));
    }
    println!("ok");
    Ok(())
}
