//! Read-only catalog views for the CLI: the paginated list, ranked search
//! and a random sample.

use anyhow::Result;

use maillots_core::models::CatalogEntry;
use maillots_core::natural::sort_natural;
use maillots_core::paging::{page_window, render_window, sample, Page};
use maillots_core::search::{rank, RankedEntry};
use maillots_core::store::CatalogBackend;

use crate::config::Config;
use crate::json_store::JsonFileStore;

async fn load_catalog(config: &Config) -> Result<Vec<CatalogEntry>> {
    JsonFileStore::new(&config.catalog.path).load().await
}

fn format_entry(entry: &CatalogEntry) -> String {
    let tags = if entry.tags.is_empty() {
        "-".to_string()
    } else {
        entry.tags.join(", ")
    };
    format!("{:<12} {:<28} {}", entry.model_id, entry.image_path, tags)
}

fn print_footer<T>(page: &Page<'_, T>) {
    if page.total_pages > 1 {
        println!();
        println!(
            "page {} of {} ({} models)   {}",
            page.number,
            page.total_pages,
            page.total_items,
            render_window(&page_window(page.number, page.total_pages))
        );
    }
}

/// `maillots list`: the catalog in natural order, one page at a time.
pub async fn run_list(config: &Config, page: usize) -> Result<()> {
    let mut entries = load_catalog(config).await?;
    if entries.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }
    sort_natural(&mut entries);

    let page = Page::of(&entries, page, config.browse.page_size);
    for entry in page.items {
        println!("{}", format_entry(entry));
    }
    print_footer(&page);
    Ok(())
}

/// `maillots search`: ranked matches for `query`, one page at a time.
pub async fn run_search(config: &Config, query: &str, page: usize) -> Result<()> {
    let entries = load_catalog(config).await?;
    let ranked: Vec<RankedEntry<'_>> = rank(&entries, query);
    if ranked.is_empty() {
        println!("No models match \"{}\".", query.trim());
        return Ok(());
    }

    let page = Page::of(&ranked, page, config.browse.page_size);
    for hit in page.items {
        let label = hit.tier.map(|t| t.label()).unwrap_or("");
        println!("{:<9} {}", label, format_entry(hit.entry));
    }
    print_footer(&page);
    Ok(())
}

/// `maillots sample`: a few random models.
pub async fn run_sample(config: &Config, count: Option<usize>) -> Result<()> {
    let entries = load_catalog(config).await?;
    if entries.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }
    let count = count.unwrap_or(config.browse.sample_size);
    for entry in sample(&entries, count) {
        println!("{}", format_entry(entry));
    }
    Ok(())
}
